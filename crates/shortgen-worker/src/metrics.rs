//! Job metrics.
//!
//! These go through the global `metrics` recorder; without one installed
//! they are no-ops.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_SUBMITTED_TOTAL: &str = "shortgen_jobs_submitted_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "shortgen_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "shortgen_jobs_failed_total";
    pub const HIGHLIGHTS_TOTAL: &str = "shortgen_highlights_total";
    pub const JOB_DURATION_SECONDS: &str = "shortgen_job_duration_seconds";
}

pub fn record_job_submitted() {
    counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);
}

pub fn record_job_completed(duration_secs: f64) {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
    histogram!(names::JOB_DURATION_SECONDS).record(duration_secs);
}

/// `reason` is a short, low-cardinality label such as `timeout` or `error`.
pub fn record_job_failed(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::JOBS_FAILED_TOTAL, &labels).increment(1);
}

/// Count planned highlights by the tier that produced them.
pub fn record_highlights(source: &str, count: usize) {
    if count == 0 {
        return;
    }
    let labels = [("source", source.to_string())];
    counter!(names::HIGHLIGHTS_TOTAL, &labels).increment(count as u64);
}
