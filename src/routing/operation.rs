//! Type-erased route operations and the handler capability trait.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::response::Response;
use futures::future::BoxFuture;

use super::RequestContext;

pub type OperationFuture = BoxFuture<'static, Response>;

type OperationFn = dyn Fn(RequestContext) -> OperationFuture + Send + Sync;

/// Decorator around a single operation. Receives the request context and the
/// wrapped operation; may short-circuit or enrich the context before calling
/// `next.invoke`.
pub type RouteMiddleware =
    Arc<dyn Fn(RequestContext, Operation) -> OperationFuture + Send + Sync>;

/// A named async callable that consumes a request context and produces the
/// full response.
#[derive(Clone)]
pub struct Operation {
    name: &'static str,
    call: Arc<OperationFn>,
}

impl Operation {
    pub fn new<F, Fut>(name: &'static str, f: F) -> Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            name,
            call: Arc::new(move |ctx| -> OperationFuture { Box::pin(f(ctx)) }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn invoke(&self, ctx: RequestContext) -> OperationFuture {
        (self.call)(ctx)
    }

    /// Wraps this operation so every call goes through `middleware` first.
    pub fn with_middleware(self, middleware: RouteMiddleware) -> Self {
        let name = self.name;
        Self {
            name,
            call: Arc::new(move |ctx| middleware(ctx, self.clone())),
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation").field("name", &self.name).finish()
    }
}

/// A domain handler exposing its operations for convention-based routing.
///
/// `operations` lists every public operation in declaration order; the binder
/// decides which of them become routes.
pub trait RouteHandler: Send + Sync + 'static {
    fn handler_name(&self) -> &'static str;

    fn operations(self: Arc<Self>) -> Vec<Operation>;
}

/// Builds a `Vec<Operation>` from `"OperationName" => method` pairs. Each
/// method must be `async fn(&self, RequestContext) -> R` where
/// `R: IntoResponse`.
///
/// ```ignore
/// fn operations(self: Arc<Self>) -> Vec<Operation> {
///     route_operations!(self;
///         "CreateUser" => create_user,
///         "GetUser" => get_user,
///     )
/// }
/// ```
#[macro_export]
macro_rules! route_operations {
    ($this:expr; $($name:literal => $method:ident),+ $(,)?) => {
        vec![$({
            let handler = ::std::sync::Arc::clone(&$this);
            $crate::routing::Operation::new($name, move |ctx| {
                let handler = ::std::sync::Arc::clone(&handler);
                async move {
                    ::axum::response::IntoResponse::into_response(handler.$method(ctx).await)
                }
            })
        }),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_invoke_forwards_context() {
        let op = Operation::new("Echo", |ctx: RequestContext| async move {
            ctx.query_param("q").unwrap_or("none").to_string().into_response()
        });

        let mut ctx = RequestContext::default();
        ctx.query.insert("q".to_string(), "hi".to_string());

        let response = op.invoke(ctx).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"hi");
        assert_eq!(op.name(), "Echo");
    }

    #[tokio::test]
    async fn test_middleware_can_short_circuit_and_enrich() {
        let op = Operation::new("WhoAmI", |ctx: RequestContext| async move {
            ctx.actor.unwrap_or_default().to_string().into_response()
        });
        let middleware: RouteMiddleware =
            Arc::new(|mut ctx: RequestContext, next: Operation| -> OperationFuture {
                Box::pin(async move {
                    if ctx.header("x-block").is_some() {
                        return StatusCode::FORBIDDEN.into_response();
                    }
                    ctx.actor = Some(7);
                    next.invoke(ctx).await
                })
            });
        let wrapped = op.with_middleware(middleware);
        assert_eq!(wrapped.name(), "WhoAmI");

        let response = wrapped.invoke(RequestContext::default()).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"7");

        let mut blocked = RequestContext::default();
        blocked
            .headers
            .insert("x-block", axum::http::HeaderValue::from_static("1"));
        assert_eq!(wrapped.invoke(blocked).await.status(), StatusCode::FORBIDDEN);
    }

    struct Things;

    impl Things {
        async fn create_thing(&self, _ctx: RequestContext) -> StatusCode {
            StatusCode::CREATED
        }

        async fn export_things(&self, _ctx: RequestContext) -> StatusCode {
            StatusCode::OK
        }
    }

    impl RouteHandler for Things {
        fn handler_name(&self) -> &'static str {
            "Things"
        }

        fn operations(self: Arc<Self>) -> Vec<Operation> {
            crate::route_operations!(self;
                "CreateThing" => create_thing,
                "ExportThings" => export_things,
            )
        }
    }

    #[tokio::test]
    async fn test_route_operations_macro_preserves_order() {
        let ops = Arc::new(Things).operations();
        let names: Vec<_> = ops.iter().map(Operation::name).collect();
        assert_eq!(names, ["CreateThing", "ExportThings"]);

        let response = ops[0].invoke(RequestContext::default()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
