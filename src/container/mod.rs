//! Dependency wiring.
//!
//! [`ServiceFactory`] builds each repository, service and handler once and
//! caches it; [`Container`] asks the factory for the handlers and registers
//! them with the auto router.

mod factory;

use std::sync::Arc;

use thiserror::Error;

pub use factory::{ComponentKey, ServiceFactory};

use crate::api::middleware::actor_middleware;
use crate::db::AsyncDbPool;
use crate::routing::{AutoRouter, RouteTable};

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Unknown component: {0}")]
    UnknownComponent(String),
}

/// The wired application: the factory plus the route table built from its
/// handlers.
pub struct Container {
    factory: Arc<ServiceFactory>,
    routes: RouteTable,
}

impl Container {
    /// Builds the handler chains over `pool` and registers them:
    /// `UserHandler` under `/users`, `PostHandler` under `/posts` with the
    /// actor middleware.
    pub async fn new(pool: AsyncDbPool) -> Result<Self, ContainerError> {
        let factory = Arc::new(ServiceFactory::new(pool));

        let routes = AutoRouter::new()
            .register_handler("/users", factory.user_handler().await?)
            .register_handler_with("/posts", factory.post_handler().await?, actor_middleware())
            .build();

        Ok(Self { factory, routes })
    }

    pub fn factory(&self) -> &Arc<ServiceFactory> {
        &self.factory
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::lazy_connection_pool;

    #[tokio::test]
    async fn test_container_registers_both_handlers() {
        let container = Container::new(lazy_connection_pool(&DatabaseConfig::default()))
            .await
            .unwrap();

        let routes = container.routes().list_routes();
        assert_eq!(routes.len(), 13);
        assert_eq!(routes.iter().filter(|r| r.handler == "UserHandler").count(), 7);
        assert_eq!(routes.iter().filter(|r| r.handler == "PostHandler").count(), 6);
        assert_eq!(container.routes().collisions().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_component_is_the_only_failure() {
        let container = Container::new(lazy_connection_pool(&DatabaseConfig::default()))
            .await
            .unwrap();

        let err = container.factory().resolve_named("route_table").await.unwrap_err();
        let ContainerError::UnknownComponent(name) = &err;
        assert_eq!(name, "route_table");
        assert_eq!(err.to_string(), "Unknown component: route_table");
    }

    #[tokio::test]
    async fn test_container_reuses_factory_components() {
        let container = Container::new(lazy_connection_pool(&DatabaseConfig::default()))
            .await
            .unwrap();

        let a = container.factory().user_handler().await.unwrap();
        let b = container.factory().user_handler().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
