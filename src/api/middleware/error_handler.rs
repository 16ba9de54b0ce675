//! Error handler for converting AppError to HTTP responses.
//!
//! Maps every `AppError` variant to a status code and an `ErrorResponse`
//! body, and normalizes error responses produced outside the handlers
//! (unknown routes, wrong methods, body limits) into the same shape.

use axum::{
    Json,
    body::Bytes,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Unauthorized { .. } => "UNAUTHORIZED",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::Database { .. } => "DATABASE_ERROR",
            AppError::Configuration { .. } => "CONFIGURATION_ERROR",
            AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Body for this error. Server-side failures get a generic message; the
    /// source chain is only logged.
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            AppError::NotFound { entity, field, value } => {
                ErrorResponse::not_found_error(entity, field, value)
            }
            AppError::Duplicate { entity, field, value } => {
                ErrorResponse::duplicate_error(entity, field, value)
            }
            AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
            AppError::BadRequest { message }
            | AppError::Unauthorized { message }
            | AppError::Forbidden { message } => ErrorResponse::new(self.code(), message.as_str()),
            AppError::Database { operation, .. } => ErrorResponse::new(
                self.code(),
                format!("Database operation failed: {operation}"),
            )
            .with_details(json!({ "operation": operation })),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new(self.code(), format!("Configuration error: {key}"))
                    .with_details(json!({ "key": key }))
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new(self.code(), "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new(self.code(), "An internal error occurred")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Global error handling middleware.
///
/// Error responses that are not JSON yet (axum rejections, unknown routes,
/// wrong methods) are rewritten into an `ErrorResponse`. JSON error bodies
/// get the request ID attached when they lack one.
pub async fn global_error_handler(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_else(|_| Bytes::new());

    if is_json {
        let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(&body_bytes) else {
            return Response::from_parts(parts, body_bytes.into());
        };
        if let (Some(id), Some(object)) = (&request_id, value.as_object_mut()) {
            object
                .entry("request_id")
                .or_insert_with(|| serde_json::Value::String(id.clone()));
        }
        return (parts.status, Json(value)).into_response();
    }

    let original_message = String::from_utf8_lossy(&body_bytes).trim().to_string();
    let mut error_response = status_error_response(status, original_message);
    if let Some(id) = &request_id {
        error_response = error_response.with_request_id(id);
    }

    (status, Json(error_response)).into_response()
}

fn status_error_response(status: StatusCode, original_message: String) -> ErrorResponse {
    let (code, fallback) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::SERVICE_UNAVAILABLE => ("SERVICE_UNAVAILABLE", "Service temporarily unavailable"),
        s if s.is_server_error() => ("INTERNAL_SERVER_ERROR", "An internal server error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    };

    if original_message.is_empty() {
        ErrorResponse::new(code, fallback)
    } else {
        ErrorResponse::new(code, original_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, middleware, routing::get};
    use tower::ServiceExt;

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::not_found("user", "id", 1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::duplicate("users", "email", "a").status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::validation("title", "x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::from(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::forbidden("only the author can delete this post").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = json_body(response).await;
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(body["message"], "only the author can delete this post");
    }

    #[tokio::test]
    async fn test_internal_errors_are_sanitized() {
        let body = json_body(AppError::from(anyhow::anyhow!("secret detail")).into_response()).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("secret detail"));
    }

    fn app() -> Router {
        Router::new()
            .route("/plain", get(|| async { (StatusCode::BAD_REQUEST, "bad thing") }))
            .route("/typed", get(|| async { AppError::not_found("post", "id", 4) }))
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(super::super::request_id_middleware))
    }

    #[tokio::test]
    async fn test_plain_errors_become_json() {
        let response = app()
            .oneshot(Request::builder().uri("/plain").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "bad thing");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_route_and_request_id_propagation() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["request_id"], "req-42");

        let typed = app()
            .oneshot(
                Request::builder()
                    .uri("/typed")
                    .header("x-request-id", "req-43")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(typed).await;
        assert_eq!(body["details"]["entity"], "post");
        assert_eq!(body["request_id"], "req-43");
    }
}
