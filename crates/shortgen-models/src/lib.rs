//! Shared data models for the ShortGen highlight backend.
//!
//! This crate provides Serde-serializable types for:
//! - Scored intervals and scene boundaries delivered by analysis collaborators
//! - Highlights and the metadata manifest written next to rendered clips
//! - Highlight jobs and their status records

pub mod error;
pub mod highlight;
pub mod interval;
pub mod job;
pub mod job_status;
pub mod timestamp;

// Re-export common types
pub use error::{ModelError, ModelResult};
pub use highlight::{clip_filename, Highlight, HighlightMetadata, HighlightSource, HighlightsManifest};
pub use interval::{SceneBoundary, ScoredInterval};
pub use job::{HighlightRequest, JobId};
pub use job_status::{JobRecord, JobStatus};
