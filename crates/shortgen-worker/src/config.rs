//! Worker configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use shortgen_models::{HighlightRequest, ModelError};
use shortgen_scoring::{DurationWindow, MergeStrategy, PlanParams, SelectionWeights};

use crate::error::WorkerResult;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum concurrent jobs
    pub max_concurrent_jobs: usize,
    /// Job timeout
    pub job_timeout: Duration,
    /// Where rendered highlights are written, one folder per job
    pub results_dir: PathBuf,
    /// Where uploaded videos are stored
    pub upload_dir: PathBuf,
    /// Weights for the sentiment and intensity tracks
    pub weights: SelectionWeights,
    /// How the two tracks are merged
    pub merge_strategy: MergeStrategy,
    /// Lowercase file extensions accepted for upload
    pub allowed_extensions: Vec<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 2,
            job_timeout: Duration::from_secs(3600), // 1 hour
            results_dir: PathBuf::from("results"),
            upload_dir: PathBuf::from("uploads"),
            weights: SelectionWeights::default(),
            merge_strategy: MergeStrategy::default(),
            allowed_extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    ["mp4", "avi", "mov", "mkv", "webm"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = SelectionWeights::default();

        Self {
            max_concurrent_jobs: std::env::var("WORKER_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(2),
            job_timeout: Duration::from_secs(
                std::env::var("WORKER_JOB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            results_dir: std::env::var("RESULTS_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("results")),
            upload_dir: std::env::var("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            weights: SelectionWeights::new(
                std::env::var("HIGHLIGHT_WEIGHT_SENTIMENT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.sentiment),
                std::env::var("HIGHLIGHT_WEIGHT_INTENSITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.intensity),
            ),
            merge_strategy: std::env::var("HIGHLIGHT_MERGE_STRATEGY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            allowed_extensions: std::env::var("ALLOWED_EXTENSIONS")
                .map(|s| {
                    s.split(',')
                        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                        .filter(|ext| !ext.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| default_extensions()),
        }
    }

    /// Reject tuning values the scoring core cannot use.
    pub fn validate(&self) -> WorkerResult<()> {
        let SelectionWeights {
            sentiment,
            intensity,
        } = self.weights;
        let usable = |w: f64| w.is_finite() && w >= 0.0;
        if !usable(sentiment) || !usable(intensity) {
            return Err(ModelError::InvalidWeights {
                sentiment,
                intensity,
            }
            .into());
        }
        Ok(())
    }

    /// Check whether a file name carries one of the allowed extensions.
    pub fn is_allowed_file(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    /// Folder holding the outputs of one job.
    pub fn job_results_dir(&self, job_id: &str) -> PathBuf {
        self.results_dir.join(job_id)
    }

    /// Build planning parameters for a validated request.
    pub fn plan_params(&self, request: &HighlightRequest) -> WorkerResult<PlanParams> {
        request.validate()?;
        let window = DurationWindow::new(request.min_duration, request.max_duration)?;

        Ok(PlanParams::new(request.num_highlights as usize, window)
            .with_weights(self.weights)
            .with_strategy(self.merge_strategy))
    }
}
