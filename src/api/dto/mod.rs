//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `user` - User-related request/response DTOs
//! - `post` - Post-related request/response DTOs
//! - `health` - Health check responses
//! - `routes` - Route manifest served at `/debug/routes`
//! - `error` - Common error response DTOs

mod error;
mod health;
mod post;
mod routes;
mod user;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use post::{CreatePostRequest, PostListResponse, PostResponse, UpdatePostRequest};
pub use routes::RouteManifest;
pub use user::{
    ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserProfileResponse,
    UserResponse,
};

/// RFC 3339 rendering used for every timestamp in responses.
pub(crate) fn format_timestamp(ts: jiff_diesel::Timestamp) -> String {
    ts.to_jiff().to_string()
}
