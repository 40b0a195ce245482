//! Ranking merged segments by weighted score.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use shortgen_models::ScoredInterval;
use tracing::debug;

use crate::error::ScoringResult;
use crate::merge::{merge_tracks, MergeStrategy, MergedSegment};
use crate::normalize::{normalize, Track};

/// Weights applied to the normalized scores. They do not need to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionWeights {
    pub sentiment: f64,
    pub intensity: f64,
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            sentiment: 0.4,
            intensity: 0.6,
        }
    }
}

impl SelectionWeights {
    pub fn new(sentiment: f64, intensity: f64) -> Self {
        Self {
            sentiment,
            intensity,
        }
    }

    /// Weighted sum of the two normalized scores.
    pub fn combine(&self, sentiment_score: f64, intensity_score: f64) -> f64 {
        sentiment_score * self.sentiment + intensity_score * self.intensity
    }
}

/// Merges the sentiment and intensity tracks and picks the top segments.
#[derive(Debug, Clone, Default)]
pub struct HighlightSelector {
    weights: SelectionWeights,
    strategy: MergeStrategy,
}

impl HighlightSelector {
    /// Create with default weights (0.4 sentiment / 0.6 intensity) and exact-key merging.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, weights: SelectionWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn weights(&self) -> SelectionWeights {
        self.weights
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Return up to `num_highlights` segments, best first.
    ///
    /// Each track is normalized on its own range before weighting. Ties keep
    /// first-seen order (sentiment intervals before intensity intervals).
    /// Fewer than `num_highlights` results is normal when the tracks are sparse.
    pub fn select(
        &self,
        sentiment: &[ScoredInterval],
        intensity: &[ScoredInterval],
        num_highlights: usize,
    ) -> ScoringResult<Vec<MergedSegment>> {
        let norm_sentiment = normalize(Track::Sentiment, sentiment)?;
        let norm_intensity = normalize(Track::Intensity, intensity)?;

        let mut merged = merge_tracks(&norm_sentiment, &norm_intensity, self.strategy);
        for segment in &mut merged {
            segment.combined_score = self
                .weights
                .combine(segment.sentiment_score, segment.intensity_score);
        }

        let candidates = merged.len();
        // sort_by is stable
        merged.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(Ordering::Equal)
        });
        merged.truncate(num_highlights);

        debug!(
            candidates,
            selected = merged.len(),
            strategy = self.strategy.as_str(),
            "Ranked highlight candidates"
        );

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(items: &[(f64, f64, f64)]) -> Vec<ScoredInterval> {
        items
            .iter()
            .map(|&(s, e, score)| ScoredInterval::new(s, e, score))
            .collect()
    }

    #[test]
    fn test_sentiment_only_ranks_by_sentiment() {
        let sentiment = track(&[(0.0, 10.0, 0.2), (10.0, 20.0, 0.8)]);
        let selected = HighlightSelector::new().select(&sentiment, &[], 2).unwrap();

        assert_eq!(selected.len(), 2);
        assert_eq!((selected[0].start_time, selected[0].end_time), (10.0, 20.0));
        assert!((selected[0].combined_score - 0.4).abs() < 1e-12);
        assert_eq!(selected[1].combined_score, 0.0);
        assert!(selected.iter().all(|s| s.intensity_score == 0.0));
    }

    #[test]
    fn test_degenerate_intensity_collapses_to_single_zero_segment() {
        let intensity = track(&[(0.0, 5.0, 1.0), (0.0, 5.0, 1.0)]);
        let selected = HighlightSelector::new().select(&[], &intensity, 3).unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].combined_score, 0.0);
    }

    #[test]
    fn test_combined_scores_are_non_increasing() {
        let sentiment = track(&[(0.0, 8.0, 0.1), (8.0, 16.0, 0.9), (16.0, 24.0, 0.5)]);
        let intensity = track(&[(0.0, 8.0, 3.0), (24.0, 40.0, 9.0), (40.0, 50.0, 1.0)]);

        let selected = HighlightSelector::new().select(&sentiment, &intensity, 10).unwrap();
        assert_eq!(selected.len(), 5);
        for pair in selected.windows(2) {
            assert!(pair[0].combined_score >= pair[1].combined_score);
        }
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let sentiment = track(&[(0.0, 5.0, 1.0), (5.0, 10.0, 0.0), (10.0, 15.0, 1.0)]);
        let selected = HighlightSelector::new().select(&sentiment, &[], 3).unwrap();

        assert_eq!(selected[0].start_time, 0.0);
        assert_eq!(selected[1].start_time, 10.0);
        assert_eq!(selected[2].start_time, 5.0);
    }

    #[test]
    fn test_truncates_to_requested_count() {
        let intensity = track(&[(0.0, 5.0, 1.0), (5.0, 10.0, 2.0), (10.0, 15.0, 3.0)]);
        let selected = HighlightSelector::new().select(&[], &intensity, 1).unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].start_time, 10.0);
        assert!((selected[0].combined_score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_custom_weights() {
        let sentiment = track(&[(0.0, 5.0, 0.0), (5.0, 10.0, 1.0)]);
        let intensity = track(&[(0.0, 5.0, 1.0), (5.0, 10.0, 0.0)]);

        let selector = HighlightSelector::new().with_weights(SelectionWeights::new(1.0, 0.25));
        let selected = selector.select(&sentiment, &intensity, 2).unwrap();

        assert_eq!(selected[0].start_time, 5.0);
        assert_eq!(selected[0].combined_score, 1.0);
        assert_eq!(selected[1].combined_score, 0.25);
    }

    #[test]
    fn test_overlap_strategy_combines_misaligned_tracks() {
        let sentiment = track(&[(0.0, 10.0, 0.0), (10.0, 20.0, 1.0)]);
        let intensity = track(&[(1.0, 9.0, 5.0), (11.0, 19.0, 1.0)]);

        let exact = HighlightSelector::new().select(&sentiment, &intensity, 10).unwrap();
        assert_eq!(exact.len(), 4);

        let overlap = HighlightSelector::new()
            .with_strategy(MergeStrategy::Overlap)
            .select(&sentiment, &intensity, 10)
            .unwrap();
        assert_eq!(overlap.len(), 2);
        // (0,10): 0.0 * 0.4 + 1.0 * 0.6 beats (10,20): 1.0 * 0.4 + 0.0 * 0.6
        assert_eq!(overlap[0].start_time, 0.0);
    }

    #[test]
    fn test_invalid_interval_propagates() {
        let intensity = track(&[(5.0, 1.0, 1.0)]);
        assert!(HighlightSelector::new().select(&[], &intensity, 3).is_err());
    }

    #[test]
    fn test_empty_tracks_select_nothing() {
        let selected = HighlightSelector::new().select(&[], &[], 3).unwrap();
        assert!(selected.is_empty());
    }
}
