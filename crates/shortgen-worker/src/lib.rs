//! Highlight job processing.
//!
//! This crate provides:
//! - Collaborator traits for transcription, sentiment, scenes, intensity and rendering
//! - FFmpeg/FFprobe adapters and an offline signal-file analyzer
//! - The in-memory job registry
//! - The per-video processing pipeline and a bounded job executor

pub mod analysis;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod media;
pub mod metrics;
pub mod processor;
pub mod registry;
pub mod signals;

pub use analysis::{
    ClipRenderer, Collaborators, IntensityScorer, MediaProbe, SceneDetector, SentimentScorer,
    Transcriber, VideoProbe,
};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use logging::{init_tracing, JobLogger};
pub use media::{FfmpegClipRenderer, FfprobeProbe};
pub use processor::{transcript_path, HighlightProcessor, METADATA_FILE, TRANSCRIPT_FILE};
pub use registry::{JobHandle, JobRegistry};
pub use signals::{signals_path, SignalFile, SignalFileAnalyzer};
