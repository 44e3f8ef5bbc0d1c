//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "ytthumb_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "ytthumb_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "ytthumb_http_requests_in_flight";

    // Download metrics
    pub const AVAILABILITY_CHECKS_TOTAL: &str = "ytthumb_availability_checks_total";
    pub const HINTS_REUSED_TOTAL: &str = "ytthumb_hints_reused_total";
    pub const DOWNLOADS_TOTAL: &str = "ytthumb_downloads_total";
    pub const ARCHIVES_COMPLETED_TOTAL: &str = "ytthumb_archives_completed_total";
    pub const ARCHIVES_ABORTED_TOTAL: &str = "ytthumb_archives_aborted_total";
    pub const ARCHIVE_ENTRIES: &str = "ytthumb_archive_entries";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "ytthumb_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record an availability check.
pub fn record_availability_check(best_available: Option<&str>) {
    let labels = [("best", best_available.unwrap_or("none").to_string())];
    counter!(names::AVAILABILITY_CHECKS_TOTAL, &labels).increment(1);
}

/// Record a download that reused the client's availability hint.
pub fn record_hint_reused() {
    counter!(names::HINTS_REUSED_TOTAL).increment(1);
}

/// Record a started download. `resolution` is a tier name or "all".
pub fn record_download(resolution: &str) {
    let labels = [("resolution", resolution.to_string())];
    counter!(names::DOWNLOADS_TOTAL, &labels).increment(1);
}

/// Record an archive that was written completely.
pub fn record_archive_completed(entries: usize) {
    counter!(names::ARCHIVES_COMPLETED_TOTAL).increment(1);
    histogram!(names::ARCHIVE_ENTRIES).record(entries as f64);
}

/// Record an archive that stopped before the end.
pub fn record_archive_aborted(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::ARCHIVES_ABORTED_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels.
///
/// Static and unknown paths are collapsed so arbitrary URLs cannot blow up
/// label cardinality.
fn sanitize_path(path: &str) -> String {
    const KNOWN: [&str; 6] = [
        "/api/check-availability",
        "/api/download",
        "/health",
        "/healthz",
        "/metrics",
        "/",
    ];

    if KNOWN.contains(&path) {
        path.to_string()
    } else if path.starts_with("/api/") {
        "/api/:unknown".to_string()
    } else {
        "/:static".to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
