//! Turns a handler's operations into routes using the naming convention.

use std::sync::Arc;

use super::{Operation, Route, RouteHandler, RouteMiddleware, parse_operation_name};

/// Binds every convention-matching operation of `handler` under `base_path`,
/// in the order the handler lists them. Operations whose names match no rule
/// are skipped.
pub fn bind<H>(base_path: &str, handler: Arc<H>) -> Vec<Route>
where
    H: RouteHandler + ?Sized,
{
    bind_with(base_path, handler, None)
}

/// Like [`bind`], wrapping each bound operation in `middleware`.
pub fn bind_with<H>(
    base_path: &str,
    handler: Arc<H>,
    middleware: Option<RouteMiddleware>,
) -> Vec<Route>
where
    H: RouteHandler + ?Sized,
{
    let handler_name = handler.handler_name();
    let base = normalize_base(base_path);

    handler
        .operations()
        .into_iter()
        .filter_map(|operation| {
            let Some(rule) = parse_operation_name(operation.name()) else {
                tracing::debug!(
                    handler = handler_name,
                    operation = operation.name(),
                    "No routing convention matches, operation not routed"
                );
                return None;
            };

            let path = join_path(&base, rule.suffix);
            tracing::info!(
                method = %rule.method,
                path = %path,
                handler = handler_name,
                operation = operation.name(),
                "Route bound"
            );

            let operation = match &middleware {
                Some(mw) => operation.with_middleware(Arc::clone(mw)),
                None => operation,
            };

            Some(Route {
                method: rule.method,
                path,
                handler: handler_name,
                operation,
            })
        })
        .collect()
}

fn normalize_base(base_path: &str) -> String {
    let trimmed = base_path.trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn join_path(base: &str, suffix: &str) -> String {
    let path = format!("{base}{suffix}");
    if path.is_empty() { "/".to_string() } else { path }
}
