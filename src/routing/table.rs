//! The immutable route table produced by `AutoRouter::build`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::Router;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::{Operation, RequestContext, RouteMethod};

/// One bound route: method, full path template, and the operation it invokes.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: RouteMethod,
    pub path: String,
    pub handler: &'static str,
    pub operation: Operation,
}

/// Read-only view of a route for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RouteInfo {
    pub index: usize,
    pub method: RouteMethod,
    pub path: String,
    pub handler: String,
    pub operation: String,
}

/// Two or more routes sharing one method and path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RouteCollision {
    pub method: RouteMethod,
    pub path: String,
    /// Operations in registration order; the first one is served.
    pub operations: Vec<String>,
}

/// What to do when the table contains colliding routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Log a warning and serve the first registration.
    #[default]
    Warn,
    /// Refuse to mount.
    Strict,
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("Route collision on {method} {path}: {}", .operations.join(", "))]
    PathCollision {
        method: RouteMethod,
        path: String,
        operations: Vec<String>,
    },
}

/// Ordered routes in registration order. Cloning is cheap; the table cannot
/// be modified once built.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Arc<[Route]>,
}

impl RouteTable {
    pub(crate) fn new(routes: Vec<Route>) -> Self {
        Self {
            routes: routes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn list_routes(&self) -> Vec<RouteInfo> {
        self.routes
            .iter()
            .enumerate()
            .map(|(index, route)| RouteInfo {
                index,
                method: route.method,
                path: route.path.clone(),
                handler: route.handler.to_string(),
                operation: route.operation.name().to_string(),
            })
            .collect()
    }

    /// Every (method, path) bound more than once, ordered by first occurrence.
    pub fn collisions(&self) -> Vec<RouteCollision> {
        let mut order: Vec<(RouteMethod, &str)> = Vec::new();
        let mut seen: HashMap<(RouteMethod, &str), Vec<String>> = HashMap::new();

        for route in self.routes.iter() {
            let key = (route.method, route.path.as_str());
            let entry = seen.entry(key).or_insert_with(|| {
                order.push(key);
                Vec::new()
            });
            entry.push(route.operation.name().to_string());
        }

        order
            .into_iter()
            .filter_map(|key| {
                let operations = seen.remove(&key)?;
                (operations.len() > 1).then(|| RouteCollision {
                    method: key.0,
                    path: key.1.to_string(),
                    operations,
                })
            })
            .collect()
    }

    /// Applies `policy` to the table's collisions: a warning per collision
    /// under `Warn`, an error for the first one under `Strict`.
    pub fn check(&self, policy: CollisionPolicy) -> Result<(), RoutingError> {
        for collision in self.collisions() {
            match policy {
                CollisionPolicy::Warn => tracing::warn!(
                    method = %collision.method,
                    path = %collision.path,
                    operations = ?collision.operations,
                    "Route collision, first registration is served"
                ),
                CollisionPolicy::Strict => {
                    return Err(RoutingError::PathCollision {
                        method: collision.method,
                        path: collision.path,
                        operations: collision.operations,
                    });
                }
            }
        }
        Ok(())
    }

    /// Replays the table onto `router` in registration order. A route whose
    /// (method, path) is already mounted is skipped, so the first registration
    /// wins.
    pub fn mount<S>(&self, router: Router<S>, policy: CollisionPolicy) -> Result<Router<S>, RoutingError>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.check(policy)?;

        let mut router = router;
        let mut mounted = HashSet::new();
        for route in self.routes.iter() {
            if !mounted.insert((route.method, route.path.as_str())) {
                tracing::debug!(
                    method = %route.method,
                    path = %route.path,
                    operation = route.operation.name(),
                    "Skipping shadowed route"
                );
                continue;
            }

            let operation = route.operation.clone();
            let endpoint = move |ctx: RequestContext| {
                let operation = operation.clone();
                async move { operation.invoke(ctx).await }
            };
            router = router.route(
                &route.path,
                axum::routing::on(route.method.method_filter(), endpoint),
            );
        }

        tracing::info!(
            registered = self.len(),
            mounted = mounted.len(),
            "Route table mounted"
        );
        Ok(router)
    }
}
