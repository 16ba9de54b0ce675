//! Builder that collects routes from several handlers into a `RouteTable`.

use std::sync::Arc;

use super::{Route, RouteHandler, RouteMiddleware, RouteTable, binder};

/// Accumulates routes during startup. Each `register_*` call binds one
/// handler under its base path; `build` freezes the result.
///
/// ```ignore
/// let table = AutoRouter::new()
///     .register_handler("/users", user_handler)
///     .register_handler_with("/posts", post_handler, actor_middleware())
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct AutoRouter {
    routes: Vec<Route>,
}

impl AutoRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_handler<H>(self, base_path: &str, handler: Arc<H>) -> Self
    where
        H: RouteHandler + ?Sized,
    {
        self.extend(binder::bind(base_path, handler))
    }

    pub fn register_handler_with<H>(
        self,
        base_path: &str,
        handler: Arc<H>,
        middleware: RouteMiddleware,
    ) -> Self
    where
        H: RouteHandler + ?Sized,
    {
        self.extend(binder::bind_with(base_path, handler, Some(middleware)))
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn build(self) -> RouteTable {
        tracing::info!(routes = self.routes.len(), "Route table built");
        RouteTable::new(self.routes)
    }

    fn extend(mut self, routes: Vec<Route>) -> Self {
        self.routes.extend(routes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{CollisionPolicy, Operation, RequestContext};
    use axum::Router;
    use axum::http::StatusCode;

    struct Users;
    struct Empty;

    impl Users {
        async fn ok(&self, _ctx: RequestContext) -> StatusCode {
            StatusCode::OK
        }
    }

    impl RouteHandler for Users {
        fn handler_name(&self) -> &'static str {
            "Users"
        }

        fn operations(self: Arc<Self>) -> Vec<Operation> {
            crate::route_operations!(self;
                "CreateUser" => ok,
                "GetUser" => ok,
                "GetUserProfile" => ok,
                "ChangePassword" => ok,
            )
        }
    }

    impl RouteHandler for Empty {
        fn handler_name(&self) -> &'static str {
            "Empty"
        }

        fn operations(self: Arc<Self>) -> Vec<Operation> {
            Vec::new()
        }
    }

    #[test]
    fn test_register_accumulates_in_order() {
        let router = AutoRouter::new()
            .register_handler("/users", Arc::new(Users))
            .register_handler("/empty", Arc::new(Empty))
            .register_handler("/admins", Arc::new(Users));
        assert_eq!(router.route_count(), 8);

        let table = router.build();
        let paths: Vec<_> = table.list_routes().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            [
                "/users",
                "/users/{id}",
                "/users/{id}/profile",
                "/users/{id}/password",
                "/admins",
                "/admins/{id}",
                "/admins/{id}/profile",
                "/admins/{id}/password",
            ]
        );
    }

    #[test]
    fn test_list_routes_after_mount_matches_registrations() {
        let table = AutoRouter::new()
            .register_handler("/users", Arc::new(Users))
            .register_handler("/admins", Arc::new(Users))
            .build();

        let _router: Router = table.mount(Router::new(), CollisionPolicy::Strict).unwrap();
        let listed = table.list_routes();
        assert_eq!(listed.len(), 8);
        assert!(listed.iter().enumerate().all(|(i, r)| r.index == i));
    }

    #[test]
    fn test_handler_without_operations_contributes_nothing() {
        let table = AutoRouter::new().register_handler("/empty", Arc::new(Empty)).build();
        assert!(table.is_empty());
        assert!(table.collisions().is_empty());
    }
}
