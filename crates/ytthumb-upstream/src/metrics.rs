//! Upstream metrics collection.
//!
//! Provides standardized metrics for monitoring image host traffic:
//! - Probe counters by tier and outcome
//! - Fetch counters by tier and outcome
//! - Latency histograms

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total HEAD probes by tier and outcome.
    pub const PROBES_TOTAL: &str = "ytthumb_upstream_probes_total";

    /// Probe latency in seconds by tier.
    pub const PROBE_LATENCY_SECONDS: &str = "ytthumb_upstream_probe_latency_seconds";

    /// Total GET fetches by tier and outcome.
    pub const FETCHES_TOTAL: &str = "ytthumb_upstream_fetches_total";

    /// Time to response headers in seconds by tier.
    pub const FETCH_LATENCY_SECONDS: &str = "ytthumb_upstream_fetch_latency_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record a completed probe. `outcome` is "available", "unavailable" or an
/// error kind.
pub fn record_probe(tier: &str, outcome: &str, latency_secs: f64) {
    counter!(
        names::PROBES_TOTAL,
        "tier" => tier.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        names::PROBE_LATENCY_SECONDS,
        "tier" => tier.to_string()
    )
    .record(latency_secs);
}

/// Record a fetch attempt.
pub fn record_fetch(tier: &str, outcome: &str, latency_secs: f64) {
    counter!(
        names::FETCHES_TOTAL,
        "tier" => tier.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        names::FETCH_LATENCY_SECONDS,
        "tier" => tier.to_string()
    )
    .record(latency_secs);
}
