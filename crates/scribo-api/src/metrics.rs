//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use regex::Regex;

/// Initialize the Prometheus metrics recorder.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "scribo_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "scribo_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "scribo_http_requests_in_flight";

    pub const GENERATION_CALLS_TOTAL: &str = "scribo_generation_calls_total";
    pub const PIPELINE_RUNS_TOTAL: &str = "scribo_pipeline_runs_total";
    pub const TRANSCRIPTIONS_TOTAL: &str = "scribo_transcriptions_total";

    pub const RATE_LIMIT_HITS_TOTAL: &str = "scribo_rate_limit_hits_total";
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

/// Record a generation-stage call outcome.
pub fn record_generation_call(stage: &str, outcome: &str) {
    let labels = [
        ("stage", stage.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!(names::GENERATION_CALLS_TOTAL, &labels).increment(1);
}

/// Record a server-side pipeline run by its final step.
pub fn record_pipeline_run(final_step: &str) {
    let labels = [("final_step", final_step.to_string())];
    counter!(names::PIPELINE_RUNS_TOTAL, &labels).increment(1);
}

/// Record a transcription request outcome.
pub fn record_transcription(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::TRANSCRIPTIONS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("valid uuid regex")
});

/// Sanitize path for metrics labels to keep cardinality bounded.
fn sanitize_path(path: &str) -> String {
    UUID_RE.replace_all(path, ":id").to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();
    record_http_request(&method, &path, status, duration);

    response
}
