//! Fitting selected segments into the requested duration window.

use serde::{Deserialize, Serialize};

use crate::error::{ScoringError, ScoringResult};

/// Allowed highlight length in seconds, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationWindow {
    pub min: f64,
    pub max: f64,
}

impl Default for DurationWindow {
    fn default() -> Self {
        Self {
            min: 20.0,
            max: 30.0,
        }
    }
}

impl DurationWindow {
    /// Create a validated window.
    ///
    /// The fitting and fallback functions assume a valid window and do not
    /// repair one that is inverted or negative.
    pub fn new(min: f64, max: f64) -> ScoringResult<Self> {
        let valid = min.is_finite() && max.is_finite() && min >= 0.0 && max > 0.0 && min <= max;
        if !valid {
            return Err(ScoringError::InvalidWindow { min, max });
        }
        Ok(Self { min, max })
    }

    /// Whether `duration` lies inside the window (inclusive).
    pub fn contains(&self, duration: f64) -> bool {
        duration >= self.min && duration <= self.max
    }
}

/// Adjust a segment so its length falls inside `window`.
///
/// - Too short: both sides grow by half the shortfall, clamped to
///   `[0, total_duration]`.
/// - Too long: recentred on its midpoint and shrunk to `window.max`.
///
/// The end is then clamped to `total_duration`. Returns `None` when nothing
/// of positive length is left. A segment that already fits is returned as is.
pub fn fit_to_window(
    start_time: f64,
    end_time: f64,
    window: DurationWindow,
    total_duration: f64,
) -> Option<(f64, f64)> {
    let mut start = start_time;
    let mut end = end_time;
    let current = end - start;

    if current < window.min {
        let extension = (window.min - current) / 2.0;
        start = (start - extension).max(0.0);
        end = (end + extension).min(total_duration);
    } else if current > window.max {
        let middle = (start + end) / 2.0;
        let half = window.max / 2.0;
        start = middle - half;
        end = middle + half;
    }

    if end > total_duration {
        end = total_duration;
    }

    (start < end).then_some((start, end))
}
