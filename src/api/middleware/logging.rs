//! Logging middleware for request/response tracing.
//!
//! This middleware logs incoming requests and outgoing responses with
//! timing information and request correlation via request IDs.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{Instrument, Level, info, span, warn};

use super::RequestId;

/// Logs method, path and request ID on the way in, then status and
/// duration on the way out, inside one `http_request` span.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let span = span!(
        Level::INFO,
        "http_request",
        method = %method,
        uri = %uri,
        request_id = %request_id
    );

    async move {
        info!(path = %uri.path(), "Request received");

        let start = Instant::now();
        let response = next.run(request).await;
        let duration = start.elapsed();

        if response.status().is_server_error() {
            warn!(
                status = response.status().as_u16(),
                duration_ms = duration.as_millis() as u64,
                "Response sent"
            );
        } else {
            info!(
                status = response.status().as_u16(),
                duration_ms = duration.as_millis() as u64,
                "Response sent"
            );
        }

        response
    }
    .instrument(span)
    .await
}
