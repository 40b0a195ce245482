//! Highlight job definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};

/// Upper bound on highlights requested per job.
pub const MAX_HIGHLIGHTS: u32 = 20;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-facing tuning for a highlight job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HighlightRequest {
    /// Number of highlights to produce
    #[serde(default = "default_num_highlights")]
    pub num_highlights: u32,

    /// Minimum highlight duration in seconds
    #[serde(default = "default_min_duration")]
    pub min_duration: f64,

    /// Maximum highlight duration in seconds
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,
}

fn default_num_highlights() -> u32 {
    3
}

fn default_min_duration() -> f64 {
    20.0
}

fn default_max_duration() -> f64 {
    30.0
}

impl Default for HighlightRequest {
    fn default() -> Self {
        Self {
            num_highlights: default_num_highlights(),
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
        }
    }
}

impl HighlightRequest {
    pub fn new(num_highlights: u32, min_duration: f64, max_duration: f64) -> Self {
        Self {
            num_highlights,
            min_duration,
            max_duration,
        }
    }

    /// Validate the request.
    ///
    /// The scoring core assumes a well-formed window, so this is the place
    /// where caller input gets rejected.
    pub fn validate(&self) -> ModelResult<()> {
        if self.num_highlights == 0 || self.num_highlights > MAX_HIGHLIGHTS {
            return Err(ModelError::InvalidHighlightCount {
                value: self.num_highlights,
                max: MAX_HIGHLIGHTS,
            });
        }

        let finite = self.min_duration.is_finite() && self.max_duration.is_finite();
        if !finite || self.min_duration < 0.0 || self.max_duration <= 0.0 || self.min_duration > self.max_duration {
            return Err(ModelError::InvalidDurationWindow {
                min: self.min_duration,
                max: self.max_duration,
            });
        }

        Ok(())
    }

    /// Window as a `(min, max)` pair.
    pub fn highlight_duration(&self) -> (f64, f64) {
        (self.min_duration, self.max_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_is_unique() {
        assert_ne!(JobId::new(), JobId::new());
        assert_eq!(JobId::from_string("abc").to_string(), "abc");
    }

    #[test]
    fn test_default_request() {
        let req = HighlightRequest::default();
        assert_eq!(req.num_highlights, 3);
        assert_eq!(req.highlight_duration(), (20.0, 30.0));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_defaults_from_partial_json() {
        let req: HighlightRequest = serde_json::from_str(r#"{"num_highlights": 5}"#).unwrap();
        assert_eq!(req.num_highlights, 5);
        assert_eq!(req.min_duration, 20.0);
        assert_eq!(req.max_duration, 30.0);
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let req = HighlightRequest::new(3, 40.0, 30.0);
        assert!(matches!(
            req.validate(),
            Err(ModelError::InvalidDurationWindow { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_highlights() {
        let req = HighlightRequest::new(0, 20.0, 30.0);
        assert!(matches!(
            req.validate(),
            Err(ModelError::InvalidHighlightCount { .. })
        ));
        assert!(HighlightRequest::new(MAX_HIGHLIGHTS + 1, 20.0, 30.0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_min() {
        assert!(HighlightRequest::new(2, -1.0, 30.0).validate().is_err());
        assert!(HighlightRequest::new(2, 0.0, f64::NAN).validate().is_err());
    }
}
