//! Min-max normalization of a single score track.

use std::fmt;

use serde::{Deserialize, Serialize};
use shortgen_models::ScoredInterval;

use crate::error::{ScoringError, ScoringResult};

/// Which analysis produced a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Sentiment,
    Intensity,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Sentiment => f.write_str("sentiment"),
            Track::Intensity => f.write_str("intensity"),
        }
    }
}

/// A scored interval whose score has been rescaled to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInterval {
    pub start_time: f64,
    pub end_time: f64,
    pub score: f64,
}

/// Rescale a track onto `[0, 1]` using its own min and max.
///
/// When every score in the track is equal the range is forced to 1, so the
/// whole track normalizes to 0 and contributes nothing to ranking.
///
/// Order and interval bounds are preserved. Intervals with a negative start,
/// `end_time <= start_time`, or non-finite values are rejected.
pub fn normalize(track: Track, scores: &[ScoredInterval]) -> ScoringResult<Vec<NormalizedInterval>> {
    if scores.is_empty() {
        return Ok(Vec::new());
    }

    for (index, interval) in scores.iter().enumerate() {
        validate_interval(track, index, interval)?;
    }

    let max_score = scores
        .iter()
        .map(|s| s.score)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_score = scores.iter().map(|s| s.score).fold(f64::INFINITY, f64::min);
    let range = if max_score > min_score {
        max_score - min_score
    } else {
        1.0
    };

    Ok(scores
        .iter()
        .map(|s| NormalizedInterval {
            start_time: s.start_time,
            end_time: s.end_time,
            score: (s.score - min_score) / range,
        })
        .collect())
}

fn validate_interval(track: Track, index: usize, interval: &ScoredInterval) -> ScoringResult<()> {
    let ScoredInterval {
        start_time,
        end_time,
        score,
    } = *interval;

    let reason = if !start_time.is_finite() || !end_time.is_finite() {
        Some("interval bounds must be finite")
    } else if !score.is_finite() {
        Some("score must be finite")
    } else if start_time < 0.0 {
        Some("start_time must not be negative")
    } else if end_time <= start_time {
        Some("end_time must be greater than start_time")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ScoringError::invalid_interval(
            track, index, start_time, end_time, reason,
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(scores: &[(f64, f64, f64)]) -> Vec<ScoredInterval> {
        scores
            .iter()
            .map(|&(s, e, score)| ScoredInterval::new(s, e, score))
            .collect()
    }

    #[test]
    fn test_empty_track() {
        assert!(normalize(Track::Sentiment, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_range_maps_to_unit_interval() {
        let input = track(&[(0.0, 5.0, -2.0), (5.0, 9.0, 3.0), (9.0, 12.0, 0.5)]);
        let out = normalize(Track::Intensity, &input).unwrap();

        assert_eq!(out[0].score, 0.0);
        assert_eq!(out[1].score, 1.0);
        assert!((out[2].score - 0.5).abs() < 1e-12);
        assert!(out.iter().all(|n| (0.0..=1.0).contains(&n.score)));
    }

    #[test]
    fn test_preserves_order_and_bounds() {
        let input = track(&[(30.0, 40.0, 0.9), (0.0, 10.0, 0.1)]);
        let out = normalize(Track::Sentiment, &input).unwrap();

        assert_eq!((out[0].start_time, out[0].end_time), (30.0, 40.0));
        assert_eq!((out[1].start_time, out[1].end_time), (0.0, 10.0));
    }

    #[test]
    fn test_all_equal_scores_normalize_to_zero() {
        let input = track(&[(0.0, 5.0, 0.7), (5.0, 10.0, 0.7), (10.0, 15.0, 0.7)]);
        let out = normalize(Track::Sentiment, &input).unwrap();
        assert!(out.iter().all(|n| n.score == 0.0));
    }

    #[test]
    fn test_single_interval_normalizes_to_zero() {
        let out = normalize(Track::Intensity, &track(&[(2.0, 4.0, 42.0)])).unwrap();
        assert_eq!(out[0].score, 0.0);
    }

    #[test]
    fn test_rejects_inverted_interval() {
        let input = track(&[(0.0, 5.0, 1.0), (8.0, 8.0, 0.5)]);
        let err = normalize(Track::Sentiment, &input).unwrap_err();

        match err {
            ScoringError::InvalidInterval { track, index, .. } => {
                assert_eq!(track, Track::Sentiment);
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_negative_start_and_nan_score() {
        assert!(normalize(Track::Intensity, &track(&[(-1.0, 5.0, 1.0)])).is_err());
        assert!(normalize(Track::Intensity, &track(&[(0.0, 5.0, f64::NAN)])).is_err());
    }

    #[test]
    fn test_error_message_names_track() {
        let err = normalize(Track::Intensity, &track(&[(4.0, 2.0, 1.0)])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("intensity"));
        assert!(msg.contains("index 0"));
    }
}
