use axum::{extract::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

/// One log line per request with method, path, final status and latency,
/// plus the matching request counter and duration histogram.
pub async fn request_log_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    tracing::info!(
        method = %method,
        path = %path,
        status,
        elapsed_ms = duration.as_millis() as u64,
        "{} {} -> {} ({}ms)",
        method,
        path,
        status,
        duration.as_millis()
    );

    let labels = [
        ("method", method),
        ("path", path),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    response
}
