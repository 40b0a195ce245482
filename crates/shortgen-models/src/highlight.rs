//! Highlight models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Selection tier that produced a highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HighlightSource {
    /// Ranked from the merged sentiment/intensity tracks
    Scored,
    /// Taken from raw scene boundaries
    Scene,
    /// Uniform slice of the video timeline
    Uniform,
}

impl HighlightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightSource::Scored => "scored",
            HighlightSource::Scene => "scene",
            HighlightSource::Uniform => "uniform",
        }
    }
}

impl std::fmt::Display for HighlightSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected, duration-adjusted segment destined for clip extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Highlight {
    /// Start time in seconds
    pub start_time: f64,

    /// End time in seconds (always greater than `start_time`)
    pub end_time: f64,

    /// Tier that produced this highlight
    pub source: HighlightSource,

    /// Combined score, only present for scored highlights
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Highlight {
    /// Create a new highlight.
    pub fn new(start_time: f64, end_time: f64, source: HighlightSource) -> Self {
        Self {
            start_time,
            end_time,
            source,
            score: None,
        }
    }

    /// Attach the combined score that ranked this highlight.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Span as a `(start, end)` pair.
    pub fn span(&self) -> (f64, f64) {
        (self.start_time, self.end_time)
    }
}

/// Metadata for a rendered highlight clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HighlightMetadata {
    /// Clip file name inside the job results folder
    pub filename: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Duration in seconds
    pub duration: f64,
}

impl HighlightMetadata {
    /// Build metadata for the `index`-th (0-based) highlight of a job.
    pub fn for_highlight(index: usize, highlight: &Highlight) -> Self {
        Self {
            filename: clip_filename(index),
            start_time: highlight.start_time,
            end_time: highlight.end_time,
            duration: highlight.duration(),
        }
    }
}

/// File name for the `index`-th (0-based) highlight clip.
pub fn clip_filename(index: usize) -> String {
    format!("highlight_{}.mp4", index + 1)
}

/// Manifest stored next to the rendered clips (metadata.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HighlightsManifest {
    /// Base name of the uploaded video
    pub original_video: String,

    /// Total duration of the source video in seconds
    pub total_duration: f64,

    /// Whether the source video carries an audio stream
    pub has_audio: bool,

    /// Rendered highlights, in output order
    pub highlights: Vec<HighlightMetadata>,

    /// Full transcript, when transcription succeeded
    pub transcript: Option<String>,
}
