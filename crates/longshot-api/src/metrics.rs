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
    pub const HTTP_REQUESTS_TOTAL: &str = "longshot_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "longshot_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "longshot_http_requests_in_flight";
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

/// Collapse job ids so every job shares one label set.
fn sanitize_path(path: &str) -> String {
    let mut out = Vec::new();
    let mut after_job_route = false;
    for segment in path.split('/') {
        if after_job_route && !segment.is_empty() {
            out.push(":job_id");
            after_job_route = false;
            continue;
        }
        after_job_route = matches!(segment, "status" | "result" | "jobs");
        out.push(segment);
    }
    out.join("/")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/status/9f2c4e1a0b7d4c3e8f6a5b4c3d2e1f00"),
            "/api/status/:job_id"
        );
        assert_eq!(sanitize_path("/api/jobs/abc/logs"), "/api/jobs/:job_id/logs");
        assert_eq!(sanitize_path("/api/generate"), "/api/generate");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
