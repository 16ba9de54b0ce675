//! Application state for Axum web framework.

use crate::config::RoutingConfig;
use crate::db::AsyncDbPool;
use crate::routing::RouteTable;

/// Shared state for the static endpoints. Cloning is cheap: the pool and
/// the route table are both reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Direct access to the database connection pool, used by health checks
    pub db_pool: AsyncDbPool,
    /// The auto-routed table, kept for the manifest and the OpenAPI view
    pub routes: RouteTable,
    /// Prefix the route table is mounted under
    pub api_prefix: String,
}

impl AppState {
    pub fn new(db_pool: AsyncDbPool, routes: RouteTable, routing: &RoutingConfig) -> Self {
        Self {
            db_pool,
            routes,
            api_prefix: routing.api_prefix.clone(),
        }
    }
}
