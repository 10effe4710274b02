// Request/response logging middleware.
// Bodies are plain text and pass through untouched.

use std::time::{Duration, Instant};
use axum::{
    body::Body,
    http::{Method, Request, Response, StatusCode},
    middleware::Next,
};
use tracing::{info, warn};

/// Logs method, path, status and latency of every request
pub async fn response_logger(req: Request<Body>, next: Next) -> Response<Body> {
    let start: Instant = Instant::now();
    let method: Method = req.method().clone();
    let path: String = req.uri().path().to_owned();

    let response: Response<Body> = next.run(req).await;

    let status: StatusCode = response.status();
    let elapsed: Duration = start.elapsed();

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), elapsed_ms = elapsed.as_millis() as u64, "request failed");
    } else {
        info!(%method, %path, status = status.as_u16(), elapsed_ms = elapsed.as_millis() as u64, "request served");
    }

    response
}
