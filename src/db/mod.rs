//! Database connection pool and embedded migrations.

mod pool;

pub use pool::{AsyncDbPool, establish_async_connection_pool, lazy_connection_pool};

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Opens a blocking connection for the migration harness.
pub(crate) fn establish_migration_connection(database_url: &str) -> AppResult<PgConnection> {
    PgConnection::establish(database_url).map_err(|e| AppError::Database {
        operation: "establish connection for migrations".to_string(),
        source: anyhow::anyhow!("Connection error: {}", e),
    })
}

/// Applies pending migrations and returns the applied versions.
///
/// The harness is synchronous, so it runs on the blocking thread pool.
pub async fn run_pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    let database_url = database_url.to_string();

    tokio::task::spawn_blocking(move || {
        let mut conn = establish_migration_connection(&database_url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Database {
                operation: "run pending migrations".to_string(),
                source: anyhow::anyhow!("Migration error: {}", e),
            })?;
        Ok(applied.iter().map(|version| version.to_string()).collect())
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?
}
