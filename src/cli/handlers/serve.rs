//! Serve command handler
//!
//! Only the dry run lives here; actual startup is [`crate::server::Server`].

use crate::config::settings::Settings;
use crate::container::Container;
use crate::db::lazy_connection_pool;
use crate::error::{AppError, AppResult};

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// With `dry_run` validates and exits; otherwise returns so the caller
    /// can start the server.
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            self.validate_only().await
        } else {
            Ok(())
        }
    }

    /// Validates the configuration and builds the route table against the
    /// configured collision policy, without touching the database.
    pub async fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());

        let container = Container::new(lazy_connection_pool(&self.config.database))
            .await
            .map_err(|e| AppError::Internal { source: e.into() })?;
        let routes = container.routes();

        routes
            .check(self.config.routing.collision_policy)
            .map_err(|e| AppError::Configuration {
                key: "routing.collision_policy".to_string(),
                source: e.into(),
            })?;

        println!(
            "✓ {} route(s) under '{}'",
            routes.len(),
            self.config.routing.api_prefix
        );
        for collision in routes.collisions() {
            println!(
                "! {} {} is claimed by {}",
                collision.method,
                collision.path,
                collision.operations.join(", ")
            );
        }

        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
