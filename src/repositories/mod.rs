//! Repository layer for data access operations.
//!
//! Each entity gets an `async_trait` capability trait plus a diesel-async
//! PostgreSQL implementation. Services depend on the traits so tests can
//! substitute the in-memory doubles from `memory`.

mod post_repo;
mod user_repo;

#[cfg(test)]
pub(crate) mod memory;

pub use post_repo::{PgPostRepository, PostRepository};
pub use user_repo::{PgUserRepository, UserRepository};

/// Current time in the representation the schema stores.
pub(crate) fn now() -> jiff_diesel::Timestamp {
    jiff_diesel::Timestamp::from(jiff::Timestamp::now())
}
