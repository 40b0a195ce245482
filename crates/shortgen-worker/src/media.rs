//! FFmpeg and FFprobe adapters.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use shortgen_models::timestamp::format_seconds;
use shortgen_models::Highlight;

use crate::analysis::{ClipRenderer, MediaProbe, VideoProbe};
use crate::error::{WorkerError, WorkerResult};

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
}

impl FfprobeOutput {
    fn into_probe(self) -> WorkerResult<VideoProbe> {
        if !self.streams.iter().any(|s| s.codec_type == "video") {
            return Err(WorkerError::FfprobeFailed {
                message: "No video stream found".to_string(),
                stderr: None,
            });
        }

        let duration = self
            .format
            .duration
            .as_ref()
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        Ok(VideoProbe {
            duration,
            has_audio: self.streams.iter().any(|s| s.codec_type == "audio"),
        })
    }
}

/// Probes duration and audio presence with `ffprobe`.
#[derive(Debug, Clone, Default)]
pub struct FfprobeProbe;

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn probe(&self, video: &Path) -> WorkerResult<VideoProbe> {
        if !video.exists() {
            return Err(WorkerError::FileNotFound(video.to_path_buf()));
        }

        which::which("ffprobe").map_err(|_| WorkerError::FfprobeNotFound)?;

        let output = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(video)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(WorkerError::FfprobeFailed {
                message: "FFprobe failed".to_string(),
                stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
            });
        }

        let parsed: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
        parsed.into_probe()
    }
}

/// Builder for a single-clip FFmpeg invocation.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    input: PathBuf,
    output: PathBuf,
    input_args: Vec<String>,
    output_args: Vec<String>,
    log_level: String,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            log_level: "error".to_string(),
        }
    }

    /// Set seek position (before input).
    pub fn seek(mut self, seconds: f64) -> Self {
        self.input_args.push("-ss".to_string());
        self.input_args.push(format!("{:.3}", seconds));
        self
    }

    /// Set duration.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.input_args.push("-t".to_string());
        self.input_args.push(format!("{:.3}", seconds));
        self
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Drop the audio stream.
    pub fn no_audio(self) -> Self {
        self.output_arg("-an")
    }

    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["-y".to_string(), "-v".to_string(), self.log_level.clone()];
        args.extend(self.input_args.iter().cloned());
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());
        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());
        args
    }

    /// Run the command to completion.
    pub async fn run(&self) -> WorkerResult<()> {
        which::which("ffmpeg").map_err(|_| WorkerError::FfmpegNotFound)?;

        let args = self.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let output = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(WorkerError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
                output.status.code(),
            ))
        }
    }
}

/// Re-encodes each highlight with libx264 (and AAC when the source has audio).
#[derive(Debug, Clone, Default)]
pub struct FfmpegClipRenderer;

impl FfmpegClipRenderer {
    pub fn command(video: &Path, highlight: &Highlight, output: &Path, has_audio: bool) -> FfmpegCommand {
        let cmd = FfmpegCommand::new(video, output)
            .seek(highlight.start_time)
            .duration(highlight.duration())
            .video_codec("libx264");

        if has_audio {
            cmd.audio_codec("aac")
        } else {
            cmd.no_audio()
        }
    }
}

#[async_trait]
impl ClipRenderer for FfmpegClipRenderer {
    async fn render_clip(
        &self,
        video: &Path,
        highlight: &Highlight,
        output: &Path,
        has_audio: bool,
    ) -> WorkerResult<()> {
        debug!(
            "Rendering {} -> {} ({} - {})",
            video.display(),
            output.display(),
            format_seconds(highlight.start_time),
            format_seconds(highlight.end_time)
        );

        Self::command(video, highlight, output, has_audio).run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortgen_models::HighlightSource;

    #[test]
    fn test_clip_command_with_audio() {
        let highlight = Highlight::new(12.5, 40.0, HighlightSource::Scored);
        let args = FfmpegClipRenderer::command(Path::new("in.mp4"), &highlight, Path::new("out.mp4"), true)
            .build_args();

        let pos = |needle: &str| args.iter().position(|a| a == needle).unwrap();
        assert_eq!(args[pos("-ss") + 1], "12.500");
        assert_eq!(args[pos("-t") + 1], "27.500");
        assert_eq!(args[pos("-c:v") + 1], "libx264");
        assert_eq!(args[pos("-c:a") + 1], "aac");
        assert!(pos("-ss") < pos("-i"));
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_clip_command_without_audio() {
        let highlight = Highlight::new(0.0, 20.0, HighlightSource::Uniform);
        let args = FfmpegClipRenderer::command(Path::new("in.mp4"), &highlight, Path::new("out.mp4"), false)
            .build_args();

        assert!(args.contains(&"-an".to_string()));
        assert!(!args.contains(&"-c:a".to_string()));
    }

    #[test]
    fn test_ffprobe_output_parsing() {
        let raw = r#"{
            "format": {"duration": "93.480000"},
            "streams": [{"codec_type": "video"}, {"codec_type": "audio"}]
        }"#;
        let probe = serde_json::from_str::<FfprobeOutput>(raw).unwrap().into_probe().unwrap();
        assert!((probe.duration - 93.48).abs() < 1e-9);
        assert!(probe.has_audio);
    }

    #[test]
    fn test_ffprobe_output_without_video_stream() {
        let raw = r#"{"format": {"duration": "10"}, "streams": [{"codec_type": "audio"}]}"#;
        let parsed: FfprobeOutput = serde_json::from_str(raw).unwrap();
        assert!(parsed.into_probe().is_err());
    }

    #[tokio::test]
    async fn test_inspecting_missing_file_fails() {
        let err = FfprobeProbe.probe(Path::new("/nonexistent/video.mp4")).await.unwrap_err();
        assert!(matches!(err, WorkerError::FileNotFound(_)));
    }
}
