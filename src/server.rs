//! Server module for managing HTTP server lifecycle
//!
//! Startup is fail-fast: migrations, pool, container and router are all
//! built before the listener binds, and any failure aborts the launch.

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, Settings};
use crate::container::Container;
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    environment: Environment,
}

impl Server {
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
        }
    }

    /// Starts the server and runs until a shutdown signal arrives.
    ///
    /// 1. Applies pending migrations when `database.auto_migrate` is set
    /// 2. Initializes the database connection pool
    /// 3. Wires the container and builds the route table
    /// 4. Mounts the table and binds the configured address
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %self.environment,
            "Application starting"
        );
        tracing::info!(
            host = %settings.server.host,
            port = settings.server.port,
            body_limit = settings.server.body_limit,
            "Server configuration loaded"
        );
        tracing::info!(
            max_connections = settings.database.max_connections,
            min_connections = settings.database.min_connections,
            connection_timeout = settings.database.connection_timeout,
            auto_migrate = settings.database.auto_migrate,
            "Database configuration loaded"
        );
        tracing::info!(
            api_prefix = %settings.routing.api_prefix,
            collision_policy = ?settings.routing.collision_policy,
            expose_manifest = settings.routing.expose_manifest,
            "Routing configuration loaded"
        );

        if settings.database.auto_migrate {
            let applied = run_pending_migrations(&settings.database.url)
                .await
                .context("Failed to apply database migrations")?;
            tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");
        }

        tracing::info!("Initializing database connection pool...");
        let pool = establish_async_connection_pool(&settings.database)
            .await
            .context("Failed to initialize database connection pool")?;
        tracing::info!("Database connection pool initialized");

        let container = Container::new(pool.clone())
            .await
            .context("Failed to wire application components")?;

        let state = AppState::new(pool, container.routes().clone(), &settings.routing);
        let router = create_router(state, settings).context("Failed to mount routes")?;
        tracing::info!(routes = container.routes().len(), "Router configured");

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for Ctrl+C or SIGTERM. If a handler cannot be installed, that
/// signal source is ignored and the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
