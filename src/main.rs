use clap::Parser;

use postboard::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};
use postboard::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, environment) = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    execute_command(&cli, settings.clone()).await?;

    if cli.starts_server() {
        Server::new(settings, environment).run().await?;
    }

    Ok(())
}
