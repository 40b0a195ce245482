//! End-to-end highlight planning for one video.

use serde::{Deserialize, Serialize};
use shortgen_models::{Highlight, HighlightSource, SceneBoundary, ScoredInterval};
use tracing::{debug, info};

use crate::duration::{fit_to_window, DurationWindow};
use crate::error::ScoringResult;
use crate::fallback::fill;
use crate::merge::MergeStrategy;
use crate::selector::{HighlightSelector, SelectionWeights};

/// Analysis output for a single video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightSignals {
    /// Sentence-level sentiment, empty when there is no transcript
    #[serde(default)]
    pub sentiment: Vec<ScoredInterval>,

    /// Scene-level motion intensity
    #[serde(default)]
    pub intensity: Vec<ScoredInterval>,

    /// Raw scene boundaries, in detection order
    #[serde(default)]
    pub scenes: Vec<SceneBoundary>,

    /// Video length in seconds
    pub total_duration: f64,
}

/// Knobs for [`plan_highlights`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanParams {
    pub num_highlights: usize,
    pub window: DurationWindow,
    pub weights: SelectionWeights,
    pub strategy: MergeStrategy,
}

impl PlanParams {
    pub fn new(num_highlights: usize, window: DurationWindow) -> Self {
        Self {
            num_highlights,
            window,
            weights: SelectionWeights::default(),
            strategy: MergeStrategy::default(),
        }
    }

    pub fn with_weights(mut self, weights: SelectionWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Ordered highlights plus a per-tier breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightPlan {
    /// Scored highlights best first, then scene, then uniform
    pub highlights: Vec<Highlight>,
    pub scored: usize,
    pub scene: usize,
    pub uniform: usize,
}

impl HighlightPlan {
    fn from_highlights(highlights: Vec<Highlight>) -> Self {
        let count = |source| highlights.iter().filter(|h| h.source == source).count();
        let scored = count(HighlightSource::Scored);
        let scene = count(HighlightSource::Scene);
        let uniform = count(HighlightSource::Uniform);
        Self {
            highlights,
            scored,
            scene,
            uniform,
        }
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }
}

/// Rank, fit and top up highlights for one video.
///
/// Selection runs whenever either track has data. Each ranked segment is
/// fitted to the window; segments that fall off the end of the video are
/// dropped. If fewer than `num_highlights` remain, scene boundaries and then
/// uniform slices make up the difference. The plan can still come up short
/// on very short videos.
pub fn plan_highlights(signals: &HighlightSignals, params: &PlanParams) -> ScoringResult<HighlightPlan> {
    let mut highlights = Vec::new();

    if !signals.sentiment.is_empty() || !signals.intensity.is_empty() {
        let selector = HighlightSelector::new()
            .with_weights(params.weights)
            .with_strategy(params.strategy);
        let ranked = selector.select(&signals.sentiment, &signals.intensity, params.num_highlights)?;

        for segment in &ranked {
            match fit_to_window(
                segment.start_time,
                segment.end_time,
                params.window,
                signals.total_duration,
            ) {
                Some((start, end)) => highlights.push(
                    Highlight::new(start, end, HighlightSource::Scored)
                        .with_score(segment.combined_score),
                ),
                None => debug!(
                    start = segment.start_time,
                    end = segment.end_time,
                    "Dropped segment outside video bounds"
                ),
            }
        }
    }

    if highlights.len() < params.num_highlights {
        let needed = params.num_highlights - highlights.len();
        let extra = fill(
            &highlights,
            needed,
            &signals.scenes,
            signals.total_duration,
            params.window,
        );
        highlights.extend(extra);
    }

    let plan = HighlightPlan::from_highlights(highlights);
    info!(
        requested = params.num_highlights,
        selected = plan.len(),
        scored = plan.scored,
        scene = plan.scene,
        uniform = plan.uniform,
        "Planned highlights"
    );

    Ok(plan)
}
