//! Post-related DTOs for API requests and responses.

use crate::models::{NewPost, PostWithAuthor, UpdatePost};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{UserResponse, format_timestamp};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "crate::utils::validate::validate_not_blank")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 10000, message = "Content must be at most 10000 characters"))]
    pub content: String,
    pub author_id: i32,
}

impl CreatePostRequest {
    pub fn into_new_post(self) -> NewPost {
        NewPost {
            title: self.title,
            content: self.content,
            author_id: self.author_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdatePostRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "crate::utils::validate::validate_not_blank")
    )]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "Content must be at most 10000 characters"))]
    pub content: Option<String>,
}

impl UpdatePostRequest {
    pub fn into_update_post(self) -> UpdatePost {
        UpdatePost {
            title: self.title,
            content: self.content,
            ..UpdatePost::default()
        }
    }
}

/// A single post with its author.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author_id: i32,
    pub author: UserResponse,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(PostWithAuthor { post, author }: PostWithAuthor) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            author: author.into(),
            created_at: format_timestamp(post.created_at),
            updated_at: format_timestamp(post.updated_at),
        }
    }
}

/// List entry: like `PostResponse` without the content.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostListResponse {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author: UserResponse,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PostWithAuthor> for PostListResponse {
    fn from(PostWithAuthor { post, author }: PostWithAuthor) -> Self {
        Self {
            id: post.id,
            title: post.title,
            author_id: post.author_id,
            author: author.into(),
            created_at: format_timestamp(post.created_at),
            updated_at: format_timestamp(post.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_request_defaults_content() {
        let request: CreatePostRequest =
            serde_json::from_str(r#"{"title":"Hello","author_id":1}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.into_new_post().content, "");
    }

    #[test]
    fn test_blank_title_rejected() {
        let request: CreatePostRequest =
            serde_json::from_str(r#"{"title":"   ","author_id":1}"#).unwrap();
        assert!(request.validate().unwrap_err().field_errors().contains_key("title"));

        let update: UpdatePostRequest = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_oversized_content_rejected() {
        let update = UpdatePostRequest {
            title: None,
            content: Some("x".repeat(10_001)),
        };
        assert!(update.validate().is_err());
    }
}
