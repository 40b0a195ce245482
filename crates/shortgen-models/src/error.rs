//! Model validation errors.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("num_highlights must be between 1 and {max}, got {value}")]
    InvalidHighlightCount { value: u32, max: u32 },

    #[error("duration window is invalid: min={min}s max={max}s")]
    InvalidDurationWindow { min: f64, max: f64 },

    #[error("weights must be finite and non-negative: sentiment={sentiment} intensity={intensity}")]
    InvalidWeights { sentiment: f64, intensity: f64 },
}
