//! Acting-user resolution for routed operations.

use std::sync::Arc;

use axum::response::IntoResponse;

use crate::error::AppError;
use crate::routing::{Operation, OperationFuture, RequestContext, RouteMiddleware};

/// Header carrying the ID of the user performing the request.
pub const ACTOR_HEADER: &str = "x-user-id";

/// Route middleware that parses `x-user-id` into `RequestContext::actor`.
///
/// A missing header leaves the actor unset; operations that need one call
/// `RequestContext::actor()` and answer 401. A malformed header is rejected
/// with 400 before the operation runs.
pub fn actor_middleware() -> RouteMiddleware {
    Arc::new(|mut ctx: RequestContext, next: Operation| -> OperationFuture {
        Box::pin(async move {
            match resolve_actor(&ctx) {
                Ok(actor) => {
                    ctx.actor = actor;
                    next.invoke(ctx).await
                }
                Err(err) => err.into_response(),
            }
        })
    })
}

fn resolve_actor(ctx: &RequestContext) -> Result<Option<i32>, AppError> {
    let Some(raw) = ctx.headers.get(ACTOR_HEADER) else {
        return Ok(None);
    };

    raw.to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|id| *id > 0)
        .map(Some)
        .ok_or_else(|| AppError::bad_request(format!("Invalid {ACTOR_HEADER} header")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    fn echo_actor() -> Operation {
        Operation::new("Echo", |ctx: RequestContext| async move {
            match ctx.actor() {
                Ok(id) => id.to_string().into_response(),
                Err(err) => err.into_response(),
            }
        })
    }

    fn ctx_with(header: Option<&'static str>) -> RequestContext {
        let mut ctx = RequestContext::default();
        if let Some(value) = header {
            ctx.headers.insert(ACTOR_HEADER, HeaderValue::from_static(value));
        }
        ctx
    }

    #[tokio::test]
    async fn test_valid_header_sets_actor() {
        let op = echo_actor().with_middleware(actor_middleware());
        let response = op.invoke(ctx_with(Some("12"))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"12");
    }

    #[tokio::test]
    async fn test_missing_header_reaches_operation_unset() {
        let op = echo_actor().with_middleware(actor_middleware());
        assert_eq!(
            op.invoke(ctx_with(None)).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_malformed_header_is_bad_request() {
        let op = echo_actor().with_middleware(actor_middleware());
        for raw in ["abc", "-3", "0"] {
            let mut ctx = RequestContext::default();
            ctx.headers
                .insert(ACTOR_HEADER, HeaderValue::from_str(raw).unwrap());
            assert_eq!(op.invoke(ctx).await.status(), StatusCode::BAD_REQUEST);
        }
    }
}
