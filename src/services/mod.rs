//! Service layer for business logic operations.
//!
//! Services enforce the domain rules (uniqueness, authorship, password
//! handling) on top of the repository traits.

mod post_service;
mod user_service;

pub use post_service::PostService;
pub use user_service::UserService;
