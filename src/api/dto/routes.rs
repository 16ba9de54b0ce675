//! Route manifest DTO.

use serde::Serialize;
use utoipa::ToSchema;

use crate::routing::{RouteCollision, RouteInfo, RouteTable};

/// Every auto-routed entry in registration order, plus detected collisions.
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteManifest {
    pub prefix: String,
    pub total: usize,
    pub routes: Vec<RouteInfo>,
    pub collisions: Vec<RouteCollision>,
}

impl RouteManifest {
    pub fn from_table(table: &RouteTable, prefix: &str) -> Self {
        let routes = table.list_routes();
        Self {
            prefix: prefix.to_string(),
            total: routes.len(),
            routes,
            collisions: table.collisions(),
        }
    }
}
