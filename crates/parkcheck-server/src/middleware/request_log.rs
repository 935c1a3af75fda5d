use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs one structured `api_request` event per request.
///
/// Only method, path, status and latency are recorded. Bodies carry health
/// data and never reach the log.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::warn!(method = %method, path = %path, status = status.as_u16(), elapsed_ms, "api_request");
    } else {
        tracing::info!(method = %method, path = %path, status = status.as_u16(), elapsed_ms, "api_request");
    }

    response
}
