//! Command handlers, one per subcommand.

pub mod migrate;
pub mod routes;
pub mod serve;

pub use migrate::MigrateCommandHandler;
pub use routes::RoutesCommandHandler;
pub use serve::ServeCommandHandler;
