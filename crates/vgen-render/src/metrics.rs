//! Render engine metrics.
//!
//! Recorded through the `metrics` facade; the API binary installs the
//! Prometheus exporter.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Render submissions by video kind and outcome.
    pub const SUBMISSIONS_TOTAL: &str = "render_submissions_total";

    /// Submission latency in seconds by video kind.
    pub const SUBMIT_LATENCY_SECONDS: &str = "render_submit_latency_seconds";

    /// Status polls by observed status.
    pub const STATUS_POLLS_TOTAL: &str = "render_status_polls_total";
}

/// Record a completed submission attempt.
pub fn record_submission(kind: &str, success: bool, latency_ms: f64) {
    counter!(
        names::SUBMISSIONS_TOTAL,
        "kind" => kind.to_string(),
        "outcome" => if success { "success" } else { "failure" }
    )
    .increment(1);

    histogram!(
        names::SUBMIT_LATENCY_SECONDS,
        "kind" => kind.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record one status poll. `status` is the job status or `"error"`.
pub fn record_poll(status: &str) {
    counter!(
        names::STATUS_POLLS_TOTAL,
        "status" => status.to_string()
    )
    .increment(1);
}
