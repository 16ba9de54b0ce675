//! Dispatches a parsed command to its handler.

use super::handlers::{MigrateCommandHandler, RoutesCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// Runs every command except a real `serve`, which returns `Ok` so the
/// caller can start the server (see [`Cli::starts_server`]).
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    cli.validate()
        .map_err(|reason| AppError::validation("cli_arguments", reason))?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => Ok(()),
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
        Some(Commands::Routes { format }) => {
            RoutesCommandHandler::new(settings).execute(*format).await
        }
    }
}
