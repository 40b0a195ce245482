//! Seams to the external analysis and media collaborators.
//!
//! The processor only talks to these traits. Production wiring uses the
//! FFmpeg adapters in [`crate::media`] together with the signal-file analyzer
//! in [`crate::signals`]; tests plug in in-memory fakes.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use shortgen_models::{Highlight, SceneBoundary, ScoredInterval};

use crate::error::WorkerResult;

/// Facts about a source video needed before analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoProbe {
    /// Duration in seconds
    pub duration: f64,
    /// Whether the container has an audio stream
    pub has_audio: bool,
}

#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, video: &Path) -> WorkerResult<VideoProbe>;
}

/// Speech-to-text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio track. `None` means there was no speech to return.
    async fn transcribe(&self, video: &Path) -> WorkerResult<Option<String>>;
}

/// Sentence-level sentiment over a transcript.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Score transcript lines. `video` identifies the source for scorers that
    /// need timing information; text-only scorers ignore it.
    async fn score_sentiment(&self, video: &Path, transcript: &str) -> WorkerResult<Vec<ScoredInterval>>;
}

#[async_trait]
pub trait SceneDetector: Send + Sync {
    /// Scene boundaries in playback order.
    async fn detect_scenes(&self, video: &Path) -> WorkerResult<Vec<SceneBoundary>>;
}

/// Frame-level visual intensity.
#[async_trait]
pub trait IntensityScorer: Send + Sync {
    async fn score_intensity(&self, video: &Path, scene: &SceneBoundary) -> WorkerResult<f64>;
}

/// Cuts one highlight out of the source video.
#[async_trait]
pub trait ClipRenderer: Send + Sync {
    async fn render_clip(
        &self,
        video: &Path,
        highlight: &Highlight,
        output: &Path,
        has_audio: bool,
    ) -> WorkerResult<()>;
}

/// Everything the processor needs from the outside world.
#[derive(Clone)]
pub struct Collaborators {
    pub probe: Arc<dyn MediaProbe>,
    pub transcriber: Arc<dyn Transcriber>,
    pub sentiment: Arc<dyn SentimentScorer>,
    pub scenes: Arc<dyn SceneDetector>,
    pub intensity: Arc<dyn IntensityScorer>,
    pub renderer: Arc<dyn ClipRenderer>,
}

impl Collaborators {
    /// Use one analyzer for all four analysis seams.
    pub fn from_analyzer<A>(
        analyzer: Arc<A>,
        probe: Arc<dyn MediaProbe>,
        renderer: Arc<dyn ClipRenderer>,
    ) -> Self
    where
        A: Transcriber + SentimentScorer + SceneDetector + IntensityScorer + 'static,
    {
        Self {
            probe,
            transcriber: analyzer.clone(),
            sentiment: analyzer.clone(),
            scenes: analyzer.clone(),
            intensity: analyzer,
            renderer,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
