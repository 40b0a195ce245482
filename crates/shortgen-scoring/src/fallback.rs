//! Fallback tiers used when scored selection comes up short.

use shortgen_models::{Highlight, HighlightSource, SceneBoundary};
use tracing::debug;

use crate::duration::DurationWindow;

/// Produce up to `needed` extra highlights from scene boundaries, then from
/// uniform slices of the timeline.
///
/// Scenes are taken in the order given, skipping any scene whose span is
/// already one of the `selected` highlights. The result is meant to be
/// appended after `selected` without re-sorting. A short or empty result is
/// valid, e.g. when `total_duration` is zero.
pub fn fill(
    selected: &[Highlight],
    needed: usize,
    scene_boundaries: &[SceneBoundary],
    total_duration: f64,
    window: DurationWindow,
) -> Vec<Highlight> {
    let mut extra = Vec::new();
    if needed == 0 {
        return extra;
    }

    let available: Vec<&SceneBoundary> = scene_boundaries
        .iter()
        .filter(|scene| {
            !selected
                .iter()
                .any(|h| h.start_time == scene.start_time && h.end_time == scene.end_time)
        })
        .collect();

    extra.extend(scene_fill(&available, needed, total_duration, window));

    let remaining = needed - extra.len();
    if remaining > 0 {
        extra.extend(uniform_fill(remaining, total_duration, window));
    }

    debug!(
        needed,
        produced = extra.len(),
        scenes_available = available.len(),
        "Fallback fill"
    );

    extra
}

fn scene_fill(
    available: &[&SceneBoundary],
    needed: usize,
    total_duration: f64,
    window: DurationWindow,
) -> Vec<Highlight> {
    let last = available.len().saturating_sub(1);

    available
        .iter()
        .take(needed)
        .enumerate()
        .filter_map(|(i, scene)| {
            let start = scene.start_time;
            let mut end = (start + window.max.min(scene.length())).min(total_duration);

            // Stretch short scenes into the window unless nothing follows them.
            if end - start < window.min && i < last {
                end = (start + window.min).min(total_duration);
            }

            (start < end).then(|| Highlight::new(start, end, HighlightSource::Scene))
        })
        .collect()
}

fn uniform_fill(remaining: usize, total_duration: f64, window: DurationWindow) -> Vec<Highlight> {
    if total_duration.is_nan() || total_duration <= 0.0 {
        return Vec::new();
    }
    let segment_length = window.max.min(total_duration / (remaining as f64 + 1.0));

    // Starts only grow, so the first slice past the end stops the walk.
    (0..remaining)
        .map_while(|i| {
            let start = (i + 1) as f64 * segment_length;
            let end = (start + segment_length).min(total_duration);
            (start < end).then(|| Highlight::new(start, end, HighlightSource::Uniform))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DurationWindow {
        DurationWindow::new(20.0, 30.0).unwrap()
    }

    fn scenes(items: &[(f64, f64)]) -> Vec<SceneBoundary> {
        items.iter().map(|&pair| pair.into()).collect()
    }

    fn spans(highlights: &[Highlight]) -> Vec<(f64, f64)> {
        highlights.iter().map(Highlight::span).collect()
    }

    #[test]
    fn test_nothing_needed() {
        let out = fill(&[], 0, &scenes(&[(0.0, 20.0)]), 50.0, window());
        assert!(out.is_empty());
    }

    #[test]
    fn test_scene_fill_takes_scenes_in_order() {
        let selected = [Highlight::new(30.0, 50.0, HighlightSource::Scored)];
        let out = fill(&selected, 2, &scenes(&[(0.0, 20.0), (20.0, 40.0)]), 50.0, window());

        assert_eq!(spans(&out), vec![(0.0, 20.0), (20.0, 40.0)]);
        assert!(out.iter().all(|h| h.source == HighlightSource::Scene));
    }

    #[test]
    fn test_long_scene_capped_at_max_duration() {
        let out = fill(&[], 1, &scenes(&[(10.0, 100.0)]), 120.0, window());
        assert_eq!(spans(&out), vec![(10.0, 40.0)]);
    }

    #[test]
    fn test_short_scene_extended_unless_last() {
        let out = fill(&[], 2, &scenes(&[(0.0, 5.0), (5.0, 8.0)]), 60.0, window());
        // First scene stretches to the minimum, the last one stays as detected.
        assert_eq!(spans(&out), vec![(0.0, 20.0), (5.0, 8.0)]);
    }

    #[test]
    fn test_scene_end_clamped_to_total_duration() {
        let out = fill(&[], 2, &scenes(&[(40.0, 45.0), (45.0, 70.0)]), 50.0, window());
        assert_eq!(spans(&out), vec![(40.0, 50.0), (45.0, 50.0)]);
    }

    #[test]
    fn test_scene_already_selected_is_skipped() {
        let selected = [Highlight::new(0.0, 20.0, HighlightSource::Scored)];
        let out = fill(&selected, 1, &scenes(&[(0.0, 20.0), (20.0, 40.0)]), 50.0, window());
        assert_eq!(spans(&out), vec![(20.0, 40.0)]);
    }

    #[test]
    fn test_uniform_fill_without_scenes() {
        let out = fill(&[], 2, &[], 90.0, window());

        assert_eq!(spans(&out), vec![(30.0, 60.0), (60.0, 90.0)]);
        assert!(out.iter().all(|h| h.source == HighlightSource::Uniform));
    }

    #[test]
    fn test_uniform_slices_shorter_than_max_on_short_video() {
        let out = fill(&[], 3, &[], 40.0, window());
        assert_eq!(spans(&out), vec![(10.0, 20.0), (20.0, 30.0), (30.0, 40.0)]);
    }

    #[test]
    fn test_scenes_then_uniform() {
        let out = fill(&[], 3, &scenes(&[(0.0, 25.0)]), 90.0, window());

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].source, HighlightSource::Scene);
        assert_eq!(spans(&out[1..]), vec![(30.0, 60.0), (60.0, 90.0)]);
    }

    #[test]
    fn test_scene_starting_past_end_falls_through_to_uniform() {
        let out = fill(&[], 1, &scenes(&[(80.0, 100.0)]), 60.0, window());
        assert_eq!(spans(&out), vec![(30.0, 60.0)]);
        assert_eq!(out[0].source, HighlightSource::Uniform);
    }

    #[test]
    fn test_zero_duration_yields_nothing() {
        assert!(fill(&[], 3, &[], 0.0, window()).is_empty());
        assert!(fill(&[], 3, &[], -5.0, window()).is_empty());
    }

    #[test]
    fn test_huge_request_on_empty_video_returns_immediately() {
        assert!(fill(&[], usize::MAX, &[], 0.0, window()).is_empty());
        assert!(fill(&[], usize::MAX / 2, &scenes(&[(10.0, 20.0)]), 0.0, window()).is_empty());
        assert!(fill(&[], 1_000, &[], f64::NAN, window()).is_empty());
    }
}
