//! Error types for highlight scoring.

use thiserror::Error;

use crate::normalize::Track;

/// Result type for scoring operations.
pub type ScoringResult<T> = Result<T, ScoringError>;

/// Errors raised by the scoring core.
///
/// Data sparsity is never an error here; only malformed input is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("invalid {track} interval at index {index} ({start_time}s..{end_time}s): {reason}")]
    InvalidInterval {
        track: Track,
        index: usize,
        start_time: f64,
        end_time: f64,
        reason: &'static str,
    },

    #[error("invalid duration window: min={min}s max={max}s")]
    InvalidWindow { min: f64, max: f64 },

    #[error("unknown merge strategy: {0}")]
    UnknownStrategy(String),
}

impl ScoringError {
    pub(crate) fn invalid_interval(
        track: Track,
        index: usize,
        start_time: f64,
        end_time: f64,
        reason: &'static str,
    ) -> Self {
        Self::InvalidInterval {
            track,
            index,
            start_time,
            end_time,
            reason,
        }
    }
}
