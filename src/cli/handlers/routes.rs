//! Routes command handler
//!
//! Wires the container over a lazy pool, so the table can be printed
//! without a reachable database.

use std::fmt::Write as _;

use crate::api::dto::RouteManifest;
use crate::cli::parser::RoutesFormat;
use crate::config::settings::Settings;
use crate::container::Container;
use crate::db::lazy_connection_pool;
use crate::error::{AppError, AppResult};

pub struct RoutesCommandHandler {
    config: Settings,
}

impl RoutesCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self, format: RoutesFormat) -> AppResult<()> {
        let output = self.render(format).await?;
        println!("{output}");
        Ok(())
    }

    /// Builds the manifest the server would mount and renders it.
    pub async fn render(&self, format: RoutesFormat) -> AppResult<String> {
        let manifest = self.manifest().await?;

        match format {
            RoutesFormat::Json => serde_json::to_string_pretty(&manifest)
                .map_err(|e| AppError::Internal { source: e.into() }),
            RoutesFormat::Table => Ok(render_table(&manifest)),
        }
    }

    async fn manifest(&self) -> AppResult<RouteManifest> {
        let pool = lazy_connection_pool(&self.config.database);
        let container = Container::new(pool)
            .await
            .map_err(|e| AppError::Internal { source: e.into() })?;

        Ok(RouteManifest::from_table(
            container.routes(),
            &self.config.routing.api_prefix,
        ))
    }
}

fn full_path(prefix: &str, path: &str) -> String {
    if prefix == "/" {
        path.to_string()
    } else {
        format!("{prefix}{path}")
    }
}

fn render_table(manifest: &RouteManifest) -> String {
    let rows: Vec<(String, String, String)> = manifest
        .routes
        .iter()
        .map(|route| {
            (
                route.method.to_string(),
                full_path(&manifest.prefix, &route.path),
                format!("{}::{}", route.handler, route.operation),
            )
        })
        .collect();

    let path_width = rows
        .iter()
        .map(|(_, path, _)| path.len())
        .max()
        .unwrap_or(0)
        .max("PATH".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<7} {:<path_width$} OPERATION", "METHOD", "PATH");
    for (method, path, operation) in &rows {
        let _ = writeln!(out, "{method:<7} {path:<path_width$} {operation}");
    }
    let _ = write!(out, "{} route(s)", manifest.total);

    for collision in &manifest.collisions {
        let _ = write!(
            out,
            "\nwarning: {} {} is claimed by {}; {} is served",
            collision.method,
            full_path(&manifest.prefix, &collision.path),
            collision.operations.join(", "),
            collision.operations.first().map(String::as_str).unwrap_or("none"),
        );
    }

    out
}
