//! User service for business logic operations.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserRepository;
use crate::utils::password::{hash_password, verify_password};

/// Wraps a `UserRepository` with account rules: unique email and
/// username among live users, and argon2-hashed passwords.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Creates a user. `new_user.password` is the plain-text password and is
    /// replaced by its hash before it reaches the repository.
    ///
    /// # Errors
    /// `Duplicate` when the email or username is already in use.
    pub async fn create_user(&self, mut new_user: NewUser) -> AppResult<User> {
        self.ensure_available(None, &new_user.email, &new_user.username)
            .await?;

        new_user.password = hash_password(&new_user.password)?;
        let user = self.repo.create(new_user).await?;

        tracing::info!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Gets a user by ID, or `NotFound`.
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.repo.find_by_username(username).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list_all().await
    }

    /// Updates profile fields. A new email or username must not belong to
    /// another live user; keeping one's own values is always allowed.
    pub async fn update_user(&self, id: i32, mut changes: UpdateUser) -> AppResult<User> {
        let current = self.get_user(id).await?;

        let email = changes.email.as_deref().unwrap_or(&current.email);
        let username = changes.username.as_deref().unwrap_or(&current.username);
        self.ensure_available(Some(id), email, username).await?;

        // Password changes go through change_password.
        changes.password = None;

        self.repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    /// Soft-deletes a user; `false` when no live user has this ID.
    pub async fn delete_user(&self, id: i32) -> AppResult<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!(user_id = id, "User deleted");
        }
        Ok(deleted)
    }

    /// Checks a plain-text password against the user's stored hash.
    pub fn validate_password(&self, user: &User, password: &str) -> AppResult<bool> {
        verify_password(password, &user.password)
    }

    /// Replaces the password after verifying the current one.
    ///
    /// # Errors
    /// `Unauthorized` when `current_password` does not match.
    pub async fn change_password(
        &self,
        id: i32,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.get_user(id).await?;

        if !self.validate_password(&user, current_password)? {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        let changes = UpdateUser {
            password: Some(hash_password(new_password)?),
            ..UpdateUser::default()
        };
        self.repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))?;

        tracing::info!(user_id = id, "Password changed");
        Ok(())
    }

    async fn ensure_available(
        &self,
        owner: Option<i32>,
        email: &str,
        username: &str,
    ) -> AppResult<()> {
        let taken = |existing: Option<User>| existing.is_some_and(|u| Some(u.id) != owner);

        if taken(self.repo.find_by_email(email).await?) {
            return Err(AppError::duplicate("users", "email", email));
        }
        if taken(self.repo.find_by_username(username).await?) {
            return Err(AppError::duplicate("users", "username", username));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::InMemoryUserRepository;

    fn service() -> UserService {
        UserService::new(InMemoryUserRepository::new())
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            name: "Test User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let service = service();
        let user = service
            .create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert_ne!(user.password, "secret123");
        assert!(user.password.starts_with("$argon2"));
        assert!(service.validate_password(&user, "secret123").unwrap());
        assert!(!service.validate_password(&user, "nope").unwrap());
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicates() {
        let service = service();
        service
            .create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        match service.create_user(new_user("bob", "alice@example.com")).await {
            Err(AppError::Duplicate { field, .. }) => assert_eq!(field, "email"),
            other => panic!("Expected Duplicate email, got {:?}", other),
        }

        match service.create_user(new_user("alice", "other@example.com")).await {
            Err(AppError::Duplicate { field, .. }) => assert_eq!(field, "username"),
            other => panic!("Expected Duplicate username, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        match service().get_user(42).await {
            Err(AppError::NotFound { entity, value, .. }) => {
                assert_eq!(entity, "user");
                assert_eq!(value, "42");
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_user_allows_own_values_and_blocks_others() {
        let service = service();
        let alice = service
            .create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();
        service
            .create_user(new_user("bob", "bob@example.com"))
            .await
            .unwrap();

        let same = UpdateUser {
            username: Some("alice".to_string()),
            email: Some("alice@example.com".to_string()),
            name: Some("Alice A.".to_string()),
            ..UpdateUser::default()
        };
        let updated = service.update_user(alice.id, same).await.unwrap();
        assert_eq!(updated.name, "Alice A.");

        let stolen = UpdateUser {
            email: Some("bob@example.com".to_string()),
            ..UpdateUser::default()
        };
        assert!(matches!(
            service.update_user(alice.id, stolen).await,
            Err(AppError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_user_ignores_password_field() {
        let service = service();
        let alice = service
            .create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let changes = UpdateUser {
            password: Some("plain".to_string()),
            ..UpdateUser::default()
        };
        let updated = service.update_user(alice.id, changes).await.unwrap();
        assert_eq!(updated.password, alice.password);
    }

    #[tokio::test]
    async fn test_delete_user_is_soft_and_frees_names() {
        let service = service();
        let alice = service
            .create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(service.delete_user(alice.id).await.unwrap());
        assert!(!service.delete_user(alice.id).await.unwrap());
        assert!(service.get_user(alice.id).await.is_err());
        assert!(service.list_users().await.unwrap().is_empty());

        let again = service
            .create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_ne!(again.id, alice.id);
    }

    #[tokio::test]
    async fn test_lookup_by_email_and_username() {
        let service = service();
        service
            .create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(service.get_user_by_email("alice@example.com").await.unwrap().is_some());
        assert!(service.get_user_by_username("alice").await.unwrap().is_some());
        assert!(service.get_user_by_username("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = service();
        let alice = service
            .create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(matches!(
            service.change_password(alice.id, "wrong", "newsecret").await,
            Err(AppError::Unauthorized { .. })
        ));

        service
            .change_password(alice.id, "secret123", "newsecret")
            .await
            .unwrap();
        let reloaded = service.get_user(alice.id).await.unwrap();
        assert!(service.validate_password(&reloaded, "newsecret").unwrap());
        assert!(!service.validate_password(&reloaded, "secret123").unwrap());
    }
}
