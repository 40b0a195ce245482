//! Job status records for progress tracking and polling.
//!
//! A record is created when a video is uploaded and is then owned by the
//! single task processing that video; readers only ever take snapshots.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::highlight::HighlightMetadata;
use crate::job::{HighlightRequest, JobId};

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job accepted, waiting for a worker slot
    #[default]
    Queued,
    /// Job is actively being processed
    Processing,
    /// All highlights rendered
    Complete,
    /// Job failed with an error
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// In-memory record of a highlight job.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobRecord {
    pub id: JobId,
    /// Sanitized upload file name
    pub filename: String,
    /// Where the upload was stored
    pub file_path: PathBuf,
    pub status: JobStatus,
    /// Progress percentage (0-100)
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub num_highlights: u32,
    /// Requested `(min, max)` highlight duration in seconds
    pub highlight_duration: (f64, f64),
    /// Error message if the job failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rendered clip paths
    #[serde(default)]
    pub result_files: Vec<PathBuf>,
    /// Rendered clip metadata, in output order
    #[serde(default)]
    pub metadata: Vec<HighlightMetadata>,
}

impl JobRecord {
    /// Create a queued record for an uploaded video.
    pub fn new(
        id: JobId,
        filename: impl Into<String>,
        file_path: impl Into<PathBuf>,
        request: &HighlightRequest,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            filename: filename.into(),
            file_path: file_path.into(),
            status: JobStatus::Queued,
            progress: 0,
            created_at: now,
            updated_at: now,
            num_highlights: request.num_highlights,
            highlight_duration: request.highlight_duration(),
            error: None,
            result_files: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Update the status and bump the updated_at timestamp.
    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Update progress, clamped to 100.
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.updated_at = Utc::now();
    }

    /// Mark job as complete with its rendered outputs.
    pub fn complete(&mut self, result_files: Vec<PathBuf>, metadata: Vec<HighlightMetadata>) {
        self.status = JobStatus::Complete;
        self.progress = 100;
        self.result_files = result_files;
        self.metadata = metadata;
        self.updated_at = Utc::now();
    }

    /// Mark job as failed with an error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.updated_at = Utc::now();
    }
}
