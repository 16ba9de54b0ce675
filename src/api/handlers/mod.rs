//! HTTP request handlers for API endpoints.
//!
//! `users` and `posts` are route-handler objects mounted through the route
//! table; `health` and `routes` are plain axum handlers.

pub mod health;
pub mod posts;
pub mod routes;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use posts::PostHandler;
pub use users::UserHandler;
