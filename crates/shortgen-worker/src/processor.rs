//! Highlight extraction pipeline for a single uploaded video.
//!
//! probe → transcribe → sentiment → scenes → intensity → plan → render,
//! writing `transcript.txt`, `highlight_<n>.mp4` and `metadata.json` into the
//! job's results folder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shortgen_models::timestamp::format_seconds;
use shortgen_models::{
    HighlightMetadata, HighlightRequest, HighlightSource, HighlightsManifest, JobStatus,
    SceneBoundary, ScoredInterval,
};
use shortgen_scoring::{plan_highlights, HighlightSignals};

use crate::analysis::Collaborators;
use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::logging::JobLogger;
use crate::metrics;
use crate::registry::JobHandle;

pub const TRANSCRIPT_FILE: &str = "transcript.txt";
pub const METADATA_FILE: &str = "metadata.json";

/// Runs the pipeline and keeps the job record up to date.
///
/// The processor moves a job through `processing` to `complete`. Marking a
/// job `failed` is left to the caller, which also owns timeouts.
#[derive(Debug, Clone)]
pub struct HighlightProcessor {
    config: Arc<WorkerConfig>,
    collaborators: Collaborators,
}

impl HighlightProcessor {
    pub fn new(config: Arc<WorkerConfig>, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub async fn process_video(
        &self,
        job: &JobHandle,
        request: &HighlightRequest,
    ) -> WorkerResult<HighlightsManifest> {
        let (job_id, video, filename) = {
            let record = job.lock().await;
            (record.id.clone(), record.file_path.clone(), record.filename.clone())
        };
        let logger = JobLogger::new(&job_id, "highlight_extraction");
        let params = self.config.plan_params(request)?;

        {
            let mut record = job.lock().await;
            record.set_status(JobStatus::Processing);
            record.set_progress(10);
        }
        logger.log_start(&format!(
            "{} ({} highlights, {}-{}s)",
            filename, request.num_highlights, request.min_duration, request.max_duration
        ));

        let job_dir = self.config.job_results_dir(job_id.as_str());
        tokio::fs::create_dir_all(&job_dir).await?;

        let probe = self.collaborators.probe.probe(&video).await?;
        set_progress(job, 20).await;
        logger.log_progress(&format!(
            "duration {}, audio: {}",
            format_seconds(probe.duration),
            probe.has_audio
        ));

        let transcript = if probe.has_audio {
            self.transcribe(&video, &job_dir, &logger).await?
        } else {
            None
        };
        set_progress(job, 40).await;

        let sentiment = match &transcript {
            Some(text) => self.score_sentiment(&video, text, &logger).await,
            None => Vec::new(),
        };
        set_progress(job, 60).await;

        let scenes = self.detect_scenes(&video, &logger).await;
        let intensity = self.score_intensity(&video, &scenes, &logger).await;
        set_progress(job, 70).await;

        let signals = HighlightSignals {
            sentiment,
            intensity,
            scenes,
            total_duration: probe.duration,
        };
        let plan = plan_highlights(&signals, &params)?;
        metrics::record_highlights(HighlightSource::Scored.as_str(), plan.scored);
        metrics::record_highlights(HighlightSource::Scene.as_str(), plan.scene);
        metrics::record_highlights(HighlightSource::Uniform.as_str(), plan.uniform);
        set_progress(job, 80).await;
        logger.log_progress(&format!(
            "planned {} highlights ({} scored, {} scene, {} uniform)",
            plan.len(),
            plan.scored,
            plan.scene,
            plan.uniform
        ));

        let total = plan.highlights.len();
        let mut result_files = Vec::with_capacity(total);
        let mut metadata = Vec::with_capacity(total);

        for (i, highlight) in plan.highlights.iter().enumerate() {
            let meta = HighlightMetadata::for_highlight(i, highlight);
            let output = job_dir.join(&meta.filename);

            logger.log_progress(&format!(
                "rendering highlight {} from {} to {}",
                i + 1,
                format_seconds(highlight.start_time),
                format_seconds(highlight.end_time)
            ));
            self.collaborators
                .renderer
                .render_clip(&video, highlight, &output, probe.has_audio)
                .await?;

            result_files.push(output);
            metadata.push(meta);
            set_progress(job, 80 + ((i + 1) * 20 / total) as u8).await;
        }

        let manifest = HighlightsManifest {
            original_video: filename,
            total_duration: probe.duration,
            has_audio: probe.has_audio,
            highlights: metadata.clone(),
            transcript,
        };
        tokio::fs::write(job_dir.join(METADATA_FILE), serde_json::to_vec_pretty(&manifest)?).await?;

        job.lock().await.complete(result_files, metadata);
        logger.log_completion(&format!("{} highlights written to {}", total, job_dir.display()));

        Ok(manifest)
    }

    /// Transcribe and persist the transcript. Transcription failures leave
    /// the job without a transcript; failing to write it is an IO error.
    async fn transcribe(
        &self,
        video: &Path,
        job_dir: &Path,
        logger: &JobLogger,
    ) -> WorkerResult<Option<String>> {
        let transcript = match self.collaborators.transcriber.transcribe(video).await {
            Ok(transcript) => transcript,
            Err(e) => {
                logger.log_warning(&format!("transcription failed: {}", e));
                None
            }
        };

        if let Some(text) = &transcript {
            tokio::fs::write(job_dir.join(TRANSCRIPT_FILE), text).await?;
        }
        Ok(transcript)
    }

    async fn score_sentiment(&self, video: &Path, transcript: &str, logger: &JobLogger) -> Vec<ScoredInterval> {
        match self.collaborators.sentiment.score_sentiment(video, transcript).await {
            Ok(scores) => scores,
            Err(e) => {
                logger.log_warning(&format!("sentiment scoring failed: {}", e));
                Vec::new()
            }
        }
    }

    async fn detect_scenes(&self, video: &Path, logger: &JobLogger) -> Vec<SceneBoundary> {
        match self.collaborators.scenes.detect_scenes(video).await {
            Ok(scenes) => {
                logger.log_progress(&format!("detected {} scenes", scenes.len()));
                scenes
            }
            Err(e) => {
                logger.log_warning(&format!("scene detection failed: {}", e));
                Vec::new()
            }
        }
    }

    /// One intensity interval per usable scene. Degenerate scenes stay
    /// available to the fallback but are not scored.
    async fn score_intensity(
        &self,
        video: &Path,
        scenes: &[SceneBoundary],
        logger: &JobLogger,
    ) -> Vec<ScoredInterval> {
        let mut intensity = Vec::with_capacity(scenes.len());

        for scene in scenes {
            if scene.start_time < 0.0 || scene.end_time <= scene.start_time {
                continue;
            }
            match self.collaborators.intensity.score_intensity(video, scene).await {
                Ok(score) if score.is_finite() => {
                    intensity.push(ScoredInterval::new(scene.start_time, scene.end_time, score))
                }
                Ok(score) => logger.log_warning(&format!(
                    "ignoring non-finite intensity {} for scene {}-{}",
                    score, scene.start_time, scene.end_time
                )),
                Err(e) => {
                    logger.log_warning(&format!("intensity scoring failed: {}", e));
                    return Vec::new();
                }
            }
        }

        intensity
    }
}

async fn set_progress(job: &JobHandle, progress: u8) {
    job.lock().await.set_progress(progress);
}

/// Where a job's transcript is written, if it has one.
pub fn transcript_path(job_dir: &Path) -> PathBuf {
    job_dir.join(TRANSCRIPT_FILE)
}
