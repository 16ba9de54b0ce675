//! Convention-based routing.
//!
//! Handlers implement [`RouteHandler`] and list their operations by name.
//! [`parse_operation_name`] maps each name to an HTTP method and a path
//! suffix, [`bind`] turns the matches into [`Route`]s, and [`AutoRouter`]
//! collects routes from several handlers into an immutable [`RouteTable`]
//! that is later mounted onto an axum `Router`.

mod auto_router;
mod binder;
mod context;
mod convention;
mod openapi;
mod operation;
mod table;

pub use auto_router::AutoRouter;
pub use binder::{bind, bind_with};
pub use context::RequestContext;
pub use convention::{RouteMethod, RouteRule, parse_operation_name};
pub use operation::{Operation, OperationFuture, RouteHandler, RouteMiddleware};
pub use table::{CollisionPolicy, Route, RouteCollision, RouteInfo, RouteTable, RoutingError};
