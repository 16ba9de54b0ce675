//! Post service for business logic operations.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewPost, PostWithAuthor, UpdatePost};
use crate::repositories::PostRepository;

/// Wraps a `PostRepository` with authoring rules: titles are required and
/// only a post's author may change or remove it.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// Creates a post and returns it joined with its author.
    ///
    /// # Errors
    /// `Validation` for a blank title or an author that does not exist.
    pub async fn create_post(&self, new_post: NewPost) -> AppResult<PostWithAuthor> {
        if new_post.title.trim().is_empty() {
            return Err(AppError::validation("title", "title is required"));
        }

        let post = self.repo.create(new_post).await?;
        tracing::info!(post_id = post.id, author_id = post.author_id, "Post created");

        self.get_post(post.id).await
    }

    /// Gets a post with its author, or `NotFound`.
    pub async fn get_post(&self, id: i32) -> AppResult<PostWithAuthor> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("post", "id", id))
    }

    pub async fn list_posts_by_author(&self, author_id: i32) -> AppResult<Vec<PostWithAuthor>> {
        self.repo.find_by_author(author_id).await
    }

    pub async fn list_posts(&self) -> AppResult<Vec<PostWithAuthor>> {
        self.repo.list_all().await
    }

    /// Updates title and content on behalf of `actor_id`.
    ///
    /// # Errors
    /// `Forbidden` when `actor_id` is not the post's author.
    pub async fn update_post(
        &self,
        id: i32,
        actor_id: i32,
        changes: UpdatePost,
    ) -> AppResult<PostWithAuthor> {
        let existing = self.get_post(id).await?;
        if existing.post.author_id != actor_id {
            return Err(AppError::forbidden(
                "only the author can update this post",
            ));
        }

        if changes.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::validation("title", "title is required"));
        }

        self.repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("post", "id", id))?;

        self.get_post(id).await
    }

    /// Soft-deletes a post on behalf of `actor_id`.
    pub async fn delete_post(&self, id: i32, actor_id: i32) -> AppResult<()> {
        let existing = self.get_post(id).await?;
        if existing.post.author_id != actor_id {
            return Err(AppError::forbidden(
                "only the author can delete this post",
            ));
        }

        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("post", "id", id));
        }
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::repositories::UserRepository;
    use crate::repositories::memory::{InMemoryPostRepository, InMemoryUserRepository};

    async fn setup() -> (PostService, i32, i32) {
        let users = InMemoryUserRepository::new();
        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            let user = users
                .create(NewUser {
                    username: name.to_string(),
                    email: format!("{name}@example.com"),
                    password: "hash".to_string(),
                    name: name.to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let posts = InMemoryPostRepository::new(users);
        (PostService::new(posts), ids[0], ids[1])
    }

    fn new_post(title: &str, author_id: i32) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "Body".to_string(),
            author_id,
        }
    }

    #[tokio::test]
    async fn test_create_post_includes_author() {
        let (service, alice, _) = setup().await;
        let created = service.create_post(new_post("Hello", alice)).await.unwrap();

        assert_eq!(created.post.title, "Hello");
        assert_eq!(created.author.username, "alice");
    }

    #[tokio::test]
    async fn test_create_post_requires_title() {
        let (service, alice, _) = setup().await;
        match service.create_post(new_post("   ", alice)).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "title"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_post_unknown_author() {
        let (service, _, _) = setup().await;
        assert!(matches!(
            service.create_post(new_post("Hello", 999)).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_only_author_may_update() {
        let (service, alice, bob) = setup().await;
        let created = service.create_post(new_post("Hello", alice)).await.unwrap();
        let id = created.post.id;

        let changes = UpdatePost {
            title: Some("Edited".to_string()),
            ..UpdatePost::default()
        };
        assert!(matches!(
            service.update_post(id, bob, changes.clone()).await,
            Err(AppError::Forbidden { .. })
        ));

        let updated = service.update_post(id, alice, changes).await.unwrap();
        assert_eq!(updated.post.title, "Edited");
        assert_eq!(updated.post.content, "Body");
    }

    #[tokio::test]
    async fn test_only_author_may_delete() {
        let (service, alice, bob) = setup().await;
        let id = service
            .create_post(new_post("Hello", alice))
            .await
            .unwrap()
            .post
            .id;

        assert!(matches!(
            service.delete_post(id, bob).await,
            Err(AppError::Forbidden { .. })
        ));
        service.delete_post(id, alice).await.unwrap();
        assert!(matches!(
            service.get_post(id).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_listing_newest_first_and_by_author() {
        let (service, alice, bob) = setup().await;
        service.create_post(new_post("First", alice)).await.unwrap();
        service.create_post(new_post("Second", bob)).await.unwrap();
        service.create_post(new_post("Third", alice)).await.unwrap();

        let titles: Vec<_> = service
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.post.title)
            .collect();
        assert_eq!(titles, ["Third", "Second", "First"]);

        let by_alice = service.list_posts_by_author(alice).await.unwrap();
        assert_eq!(by_alice.len(), 2);
        assert!(by_alice.iter().all(|p| p.post.author_id == alice));
        assert!(service.list_posts_by_author(999).await.unwrap().is_empty());
    }
}
