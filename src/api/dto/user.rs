//! User-related DTOs for API requests and responses.

use crate::models::{NewUser, UpdateUser, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::format_timestamp;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a new user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = "crate::utils::validate::validate_username"))]
    #[schema(min_length = 3, max_length = 50, pattern = "^[A-Za-z0-9_]+$")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    #[schema(format = "password", min_length = 6, max_length = 100)]
    pub password: String,
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[schema(min_length = 2, max_length = 100)]
    pub name: String,
}

impl CreateUserRequest {
    /// Converts the request into a `NewUser`. The password is still plain
    /// text here; `UserService::create_user` hashes it.
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            username: self.username,
            email: self.email,
            password: self.password,
            name: self.name,
        }
    }
}

/// Request body for updating a user. Omitted fields keep their value.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "crate::utils::validate::validate_username"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: Option<String>,
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_update_user(self) -> UpdateUser {
        UpdateUser {
            username: self.username,
            email: self.email,
            name: self.name,
            ..UpdateUser::default()
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    #[schema(format = "password")]
    pub current_password: String,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    #[schema(format = "password", min_length = 6, max_length = 100)]
    pub new_password: String,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for user data (excludes the password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            created_at: format_timestamp(user.created_at),
            updated_at: format_timestamp(user.updated_at),
        }
    }
}

/// Public profile: what other users may see.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub member_since: String,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            member_since: format_timestamp(user.created_at),
        }
    }
}
