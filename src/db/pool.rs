//! Async database connection pool implementation.
//!
//! Uses the bb8 connection pool manager with diesel_async for PostgreSQL.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// bb8::Pool is reference counted, so structures holding it can derive
/// Clone without extra Arc wrapping.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

fn builder(config: &DatabaseConfig) -> bb8::Builder<AsyncDieselConnectionManager<AsyncPgConnection>> {
    Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
}

/// Creates the pool and opens `min_connections` connections eagerly, so an
/// unreachable database fails startup.
pub async fn establish_async_connection_pool(config: &DatabaseConfig) -> Result<AsyncDbPool, AppError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);
    builder(config)
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::anyhow!("failed to build connection pool: {e}"),
        })
}

/// Creates a pool that connects on first checkout and keeps no idle
/// connections warm. Must be called inside a Tokio runtime.
///
/// Used where the dependency graph must be wired without a reachable
/// database, such as printing the route manifest.
pub fn lazy_connection_pool(config: &DatabaseConfig) -> AsyncDbPool {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);
    builder(config).min_idle(None).build_unchecked(manager)
}
