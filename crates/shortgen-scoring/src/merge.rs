//! Merging normalized sentiment and intensity tracks into candidate segments.
//!
//! Sentence-level sentiment and scene-level intensity are segmented
//! independently, so their boundaries rarely line up. `ExactKey` only joins
//! intervals with bit-identical bounds; `Overlap` folds an intensity interval
//! into the sentiment interval it overlaps most.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::normalize::NormalizedInterval;

/// How intervals from the two tracks are matched to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Join only on identical `(start_time, end_time)`.
    #[default]
    ExactKey,
    /// Join an intensity interval to the sentiment interval with the
    /// largest positive intersection (first seen wins ties).
    Overlap,
}

impl MergeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::ExactKey => "exact",
            MergeStrategy::Overlap => "overlap",
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" | "exact_key" => Ok(MergeStrategy::ExactKey),
            "overlap" => Ok(MergeStrategy::Overlap),
            other => Err(ScoringError::UnknownStrategy(other.to_string())),
        }
    }
}

/// A candidate segment carrying both normalized scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedSegment {
    pub start_time: f64,
    pub end_time: f64,
    /// Normalized sentiment score, 0 when the sentiment track had no match
    pub sentiment_score: f64,
    /// Normalized intensity score, 0 when the intensity track had no match
    pub intensity_score: f64,
    /// Weighted sum, filled in by the selector
    pub combined_score: f64,
}

impl MergedSegment {
    fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
            sentiment_score: 0.0,
            intensity_score: 0.0,
            combined_score: 0.0,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Bit pattern key for an exact `(start, end)` match. `-0.0` and `0.0` are
/// folded together since they compare equal.
type SegmentKey = (u64, u64);

fn segment_key(start_time: f64, end_time: f64) -> SegmentKey {
    fn bits(v: f64) -> u64 {
        if v == 0.0 {
            0.0f64.to_bits()
        } else {
            v.to_bits()
        }
    }
    (bits(start_time), bits(end_time))
}

/// Merge two normalized tracks into candidate segments.
///
/// Every interval from either track ends up in some segment; a side with no
/// match keeps a score of exactly 0. Segments are returned in first-seen
/// order (sentiment first), with `combined_score` left at 0.
pub fn merge_tracks(
    sentiment: &[NormalizedInterval],
    intensity: &[NormalizedInterval],
    strategy: MergeStrategy,
) -> Vec<MergedSegment> {
    let mut merger = Merger::with_capacity(sentiment.len() + intensity.len());

    for item in sentiment {
        let slot = merger.slot(item.start_time, item.end_time);
        merger.segments[slot].sentiment_score = item.score;
    }

    match strategy {
        MergeStrategy::ExactKey => {
            for item in intensity {
                let slot = merger.slot(item.start_time, item.end_time);
                merger.segments[slot].intensity_score = item.score;
            }
        }
        MergeStrategy::Overlap => {
            // Match against the sentiment spans as they were, not as widened
            // by earlier intensity matches.
            let anchors: Vec<(f64, f64)> = merger
                .segments
                .iter()
                .map(|s| (s.start_time, s.end_time))
                .collect();

            for item in intensity {
                match best_overlap(&anchors, item.start_time, item.end_time) {
                    Some(slot) => {
                        let segment = &mut merger.segments[slot];
                        segment.start_time = segment.start_time.min(item.start_time);
                        segment.end_time = segment.end_time.max(item.end_time);
                        segment.intensity_score = segment.intensity_score.max(item.score);
                    }
                    None => {
                        let slot = merger.slot(item.start_time, item.end_time);
                        let segment = &mut merger.segments[slot];
                        segment.intensity_score = segment.intensity_score.max(item.score);
                    }
                }
            }
        }
    }

    merger.segments
}

/// Insertion-ordered map from exact span to segment.
struct Merger {
    segments: Vec<MergedSegment>,
    index: HashMap<SegmentKey, usize>,
}

impl Merger {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    fn slot(&mut self, start_time: f64, end_time: f64) -> usize {
        let segments = &mut self.segments;
        *self
            .index
            .entry(segment_key(start_time, end_time))
            .or_insert_with(|| {
                segments.push(MergedSegment::new(start_time, end_time));
                segments.len() - 1
            })
    }
}

fn best_overlap(anchors: &[(f64, f64)], start_time: f64, end_time: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (slot, &(a_start, a_end)) in anchors.iter().enumerate() {
        let overlap = a_end.min(end_time) - a_start.max(start_time);
        if overlap <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_overlap)) if best_overlap >= overlap => {}
            _ => best = Some((slot, overlap)),
        }
    }
    best.map(|(slot, _)| slot)
}
