//! Migrate command handler
//!
//! Handles database migration operations including dry-run and rollback.

use diesel_migrations::MigrationHarness;

use crate::config::settings::Settings;
use crate::db::{MIGRATIONS, establish_migration_connection, run_pending_migrations};
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Applies pending migrations, lists them with `dry_run`, or reverts the
    /// last `rollback` migrations.
    ///
    /// # Errors
    /// - Database configuration or connection errors
    /// - Migration execution errors
    /// - Rollback requests larger than the applied history
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        if rollback == Some(0) {
            return Err(AppError::validation(
                "rollback_steps",
                "Number of rollback steps must be greater than 0",
            ));
        }

        self.config.database.validate()?;

        match (dry_run, rollback) {
            (true, _) => self.show_pending_migrations().await,
            (false, Some(steps)) => self.rollback_migrations(steps).await,
            (false, None) => self.run_migrations().await,
        }
    }

    async fn show_pending_migrations(&self) -> AppResult<()> {
        println!("Checking for pending migrations...");

        let database_url = self.config.database.url.clone();
        let pending: Vec<String> = tokio::task::spawn_blocking(move || -> AppResult<Vec<String>> {
            let mut conn = establish_migration_connection(&database_url)?;
            let pending = conn
                .pending_migrations(MIGRATIONS)
                .map_err(|e| AppError::Database {
                    operation: "check pending migrations".to_string(),
                    source: anyhow::anyhow!("Migration error: {}", e),
                })?;
            Ok(pending.iter().map(|m| m.name().to_string()).collect())
        })
        .await
        .map_err(|e| AppError::Internal { source: e.into() })??;

        if pending.is_empty() {
            println!("✓ No pending migrations - database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {name}");
            }
            println!("\nRun without --dry-run to apply them");
        }

        Ok(())
    }

    async fn run_migrations(&self) -> AppResult<()> {
        println!("Running database migrations...");

        let applied = run_pending_migrations(&self.config.database.url).await?;

        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {version}");
            }
        }

        Ok(())
    }

    async fn rollback_migrations(&self, steps: u32) -> AppResult<()> {
        println!("Rolling back {steps} migration(s)...");

        let database_url = self.config.database.url.clone();
        let reverted: Vec<String> = tokio::task::spawn_blocking(move || -> AppResult<Vec<String>> {
            let mut conn = establish_migration_connection(&database_url)?;

            let applied = conn.applied_migrations().map_err(|e| AppError::Database {
                operation: "get applied migrations".to_string(),
                source: anyhow::anyhow!("Migration error: {}", e),
            })?;

            if applied.len() < steps as usize {
                return Err(AppError::validation(
                    "rollback_steps",
                    format!(
                        "Cannot roll back {} migration(s); only {} applied",
                        steps,
                        applied.len()
                    ),
                ));
            }

            (0..steps)
                .map(|_| {
                    conn.revert_last_migration(MIGRATIONS)
                        .map(|version| version.to_string())
                        .map_err(|e| AppError::Database {
                            operation: "revert migration".to_string(),
                            source: anyhow::anyhow!("Migration rollback error: {}", e),
                        })
                })
                .collect()
        })
        .await
        .map_err(|e| AppError::Internal { source: e.into() })??;

        println!("✓ Rolled back {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {version}");
        }

        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
