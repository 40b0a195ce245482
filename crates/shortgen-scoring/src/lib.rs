//! Highlight scoring and segment selection.
//!
//! Turns the per-video analysis tracks into an ordered list of highlights:
//!
//! ```text
//! sentiment track ──► normalize ──┐
//!                                 ├──► merge ──► rank ──► fit to window ──┐
//! intensity track ──► normalize ──┘                                       │
//!                                                                         ▼
//! scene boundaries ─────────────────────────────────────────────► fallback fill
//! ```
//!
//! Everything in this crate is synchronous and side-effect free. Sparse
//! input (no transcript, no scenes, zero-length video) is a normal case and
//! shows up as a shorter result list, never as an error. The only hard
//! failure is a malformed interval coming from a scorer.
//!
//! # Usage
//!
//! ```rust
//! use shortgen_models::ScoredInterval;
//! use shortgen_scoring::{plan_highlights, DurationWindow, HighlightSignals, PlanParams};
//!
//! let signals = HighlightSignals {
//!     sentiment: vec![ScoredInterval::new(0.0, 10.0, 0.2), ScoredInterval::new(10.0, 20.0, 0.8)],
//!     total_duration: 120.0,
//!     ..Default::default()
//! };
//! let params = PlanParams::new(3, DurationWindow::new(20.0, 30.0).unwrap());
//! let plan = plan_highlights(&signals, &params).unwrap();
//! assert_eq!(plan.highlights.len(), 3);
//! ```

mod duration;
mod error;
mod fallback;
mod merge;
mod normalize;
mod plan;
mod selector;

pub use duration::{fit_to_window, DurationWindow};
pub use error::{ScoringError, ScoringResult};
pub use fallback::fill;
pub use merge::{merge_tracks, MergeStrategy, MergedSegment};
pub use normalize::{normalize, NormalizedInterval, Track};
pub use plan::{plan_highlights, HighlightPlan, HighlightSignals, PlanParams};
pub use selector::{HighlightSelector, SelectionWeights};
