//! Postboard
//!
//! Users/posts JSON API whose HTTP routes are derived from handler operation
//! names by the [`routing`] module.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod config;
pub mod container;
pub mod db;
pub mod error;
pub mod logger;
pub mod models;
pub mod repositories;
pub mod routing;
pub mod schema;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
