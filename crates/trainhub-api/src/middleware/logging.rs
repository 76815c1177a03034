//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Logs request method, path, status, and duration.
///
/// Server errors are logged at `warn` so they stand out from routine traffic.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), duration_ms, "HTTP request");
    } else {
        info!(%method, %path, status = status.as_u16(), duration_ms, "HTTP request");
    }

    response
}
