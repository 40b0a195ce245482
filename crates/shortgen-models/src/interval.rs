//! Time intervals produced by the analysis collaborators.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A scored span of video time, in seconds.
///
/// Produced by a scorer (sentiment or visual intensity). The score is
/// unit-less and only comparable within the track that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredInterval {
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Scorer-local score
    pub score: f64,
}

impl ScoredInterval {
    pub fn new(start_time: f64, end_time: f64, score: f64) -> Self {
        Self {
            start_time,
            end_time,
            score,
        }
    }

    /// Length of the interval in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// A scene detected by the scene-boundary collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SceneBoundary {
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
}

impl SceneBoundary {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Scene length in seconds.
    pub fn length(&self) -> f64 {
        self.end_time - self.start_time
    }
}

impl From<(f64, f64)> for SceneBoundary {
    fn from((start_time, end_time): (f64, f64)) -> Self {
        Self::new(start_time, end_time)
    }
}
