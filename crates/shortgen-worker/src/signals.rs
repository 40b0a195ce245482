//! Offline analyzer backed by a precomputed signals file.
//!
//! For `talk.mp4` the analyzer reads `talk.mp4.signals.json`:
//!
//! ```json
//! {
//!   "duration": 120.0,
//!   "has_audio": true,
//!   "transcript": "...",
//!   "sentiment": [{"start_time": 0.0, "end_time": 10.0, "score": 0.4}],
//!   "intensity": [{"start_time": 0.0, "end_time": 25.0, "score": 3.1}],
//!   "scenes": [{"start_time": 0.0, "end_time": 25.0}]
//! }
//! ```
//!
//! A video without a signals file simply has no signals, so every track
//! comes back empty and the planner falls back to uniform slicing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shortgen_models::{SceneBoundary, ScoredInterval};

use crate::analysis::{IntensityScorer, MediaProbe, SceneDetector, SentimentScorer, Transcriber, VideoProbe};
use crate::error::{WorkerError, WorkerResult};

/// Contents of a `<video>.signals.json` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalFile {
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub has_audio: bool,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub sentiment: Vec<ScoredInterval>,
    #[serde(default)]
    pub intensity: Vec<ScoredInterval>,
    #[serde(default)]
    pub scenes: Vec<SceneBoundary>,
}

/// Path of the signals file that belongs to `video`.
pub fn signals_path(video: &Path) -> PathBuf {
    let mut name = OsString::from(video.as_os_str());
    name.push(".signals.json");
    PathBuf::from(name)
}

#[derive(Debug, Clone, Default)]
pub struct SignalFileAnalyzer;

impl SignalFileAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Load the signals for `video`, `None` when there is no signals file.
    pub async fn load(&self, video: &Path) -> WorkerResult<Option<SignalFile>> {
        let path = signals_path(video);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No signals file at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let signals = serde_json::from_slice(&bytes).map_err(|e| {
            WorkerError::analysis_failed(format!("malformed signals file {}: {}", path.display(), e))
        })?;
        Ok(Some(signals))
    }

    async fn load_or_default(&self, video: &Path) -> WorkerResult<SignalFile> {
        Ok(self.load(video).await?.unwrap_or_default())
    }
}

#[async_trait]
impl MediaProbe for SignalFileAnalyzer {
    async fn probe(&self, video: &Path) -> WorkerResult<VideoProbe> {
        let signals = self
            .load(video)
            .await?
            .ok_or_else(|| WorkerError::FileNotFound(signals_path(video)))?;

        Ok(VideoProbe {
            duration: signals.duration,
            has_audio: signals.has_audio,
        })
    }
}

#[async_trait]
impl Transcriber for SignalFileAnalyzer {
    async fn transcribe(&self, video: &Path) -> WorkerResult<Option<String>> {
        let signals = self.load_or_default(video).await?;
        Ok(signals.transcript.filter(|t| !t.trim().is_empty()))
    }
}

#[async_trait]
impl SentimentScorer for SignalFileAnalyzer {
    async fn score_sentiment(&self, video: &Path, _transcript: &str) -> WorkerResult<Vec<ScoredInterval>> {
        Ok(self.load_or_default(video).await?.sentiment)
    }
}

#[async_trait]
impl SceneDetector for SignalFileAnalyzer {
    async fn detect_scenes(&self, video: &Path) -> WorkerResult<Vec<SceneBoundary>> {
        Ok(self.load_or_default(video).await?.scenes)
    }
}

#[async_trait]
impl IntensityScorer for SignalFileAnalyzer {
    async fn score_intensity(&self, video: &Path, scene: &SceneBoundary) -> WorkerResult<f64> {
        let signals = self.load_or_default(video).await?;
        Ok(intensity_for_scene(&signals.intensity, scene))
    }
}

/// Intensity recorded for `scene`: the entry with the same span, else the
/// entry overlapping it most, else 0.
fn intensity_for_scene(intensity: &[ScoredInterval], scene: &SceneBoundary) -> f64 {
    if let Some(exact) = intensity
        .iter()
        .find(|i| i.start_time == scene.start_time && i.end_time == scene.end_time)
    {
        return exact.score;
    }

    let mut best: Option<(f64, f64)> = None;
    for interval in intensity {
        let overlap = interval.end_time.min(scene.end_time) - interval.start_time.max(scene.start_time);
        if overlap <= 0.0 {
            continue;
        }
        if best.map_or(true, |(best_overlap, _)| overlap > best_overlap) {
            best = Some((overlap, interval.score));
        }
    }
    best.map(|(_, score)| score).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_signals(dir: &TempDir, video: &str, json: &str) -> PathBuf {
        let video = dir.path().join(video);
        tokio::fs::write(signals_path(&video), json).await.unwrap();
        video
    }

    #[test]
    fn test_signals_path_appends_suffix() {
        assert_eq!(
            signals_path(Path::new("/data/talk.mp4")),
            PathBuf::from("/data/talk.mp4.signals.json")
        );
    }

    #[tokio::test]
    async fn test_reads_all_tracks() {
        let dir = TempDir::new().unwrap();
        let video = write_signals(
            &dir,
            "talk.mp4",
            r#"{
                "duration": 120.0,
                "has_audio": true,
                "transcript": "hello there",
                "sentiment": [{"start_time": 0.0, "end_time": 10.0, "score": 0.4}],
                "intensity": [{"start_time": 0.0, "end_time": 25.0, "score": 3.0}],
                "scenes": [{"start_time": 0.0, "end_time": 25.0}, {"start_time": 25.0, "end_time": 60.0}]
            }"#,
        )
        .await;

        let analyzer = SignalFileAnalyzer::new();
        let probe = analyzer.probe(&video).await.unwrap();
        assert_eq!(probe.duration, 120.0);
        assert!(probe.has_audio);

        assert_eq!(analyzer.transcribe(&video).await.unwrap().as_deref(), Some("hello there"));
        assert_eq!(analyzer.score_sentiment(&video, "hello there").await.unwrap().len(), 1);

        let scenes = analyzer.detect_scenes(&video).await.unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(analyzer.score_intensity(&video, &scenes[0]).await.unwrap(), 3.0);
        assert_eq!(analyzer.score_intensity(&video, &scenes[1]).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_tracks() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("plain.mp4");
        let analyzer = SignalFileAnalyzer::new();

        assert!(analyzer.transcribe(&video).await.unwrap().is_none());
        assert!(analyzer.detect_scenes(&video).await.unwrap().is_empty());
        assert!(matches!(
            analyzer.probe(&video).await.unwrap_err(),
            WorkerError::FileNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_blank_transcript_is_none() {
        let dir = TempDir::new().unwrap();
        let video = write_signals(&dir, "quiet.mp4", r#"{"duration": 30.0, "transcript": "   "}"#).await;
        assert!(SignalFileAnalyzer::new().transcribe(&video).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let video = write_signals(&dir, "broken.mp4", "{not json").await;
        let err = SignalFileAnalyzer::new().detect_scenes(&video).await.unwrap_err();
        assert!(matches!(err, WorkerError::AnalysisFailed(_)));
    }

    #[test]
    fn test_intensity_falls_back_to_largest_overlap() {
        let intensity = vec![
            ScoredInterval::new(0.0, 12.0, 1.0),
            ScoredInterval::new(12.0, 30.0, 5.0),
        ];
        let scene = SceneBoundary::new(10.0, 20.0);
        assert_eq!(intensity_for_scene(&intensity, &scene), 5.0);
    }
}
