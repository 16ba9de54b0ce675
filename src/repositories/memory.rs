//! In-memory repository doubles mirroring the PostgreSQL behavior:
//! soft deletes, live-row uniqueness, and the author foreign key.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::{NewPost, NewUser, Post, PostWithAuthor, UpdatePost, UpdateUser, User};
use crate::repositories::{PostRepository, UserRepository, now};

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn live(&self) -> Vec<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.deleted_at.is_none())
            .cloned()
            .collect()
    }

    /// Looks a row up regardless of soft deletion, as a join would.
    fn any_by_id(&self, user_id: i32) -> Option<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
    }

    fn ensure_unique(rows: &[User], skip_id: Option<i32>, username: &str, email: &str) -> AppResult<()> {
        for row in rows.iter().filter(|u| u.deleted_at.is_none() && Some(u.id) != skip_id) {
            if row.username == username {
                return Err(AppError::duplicate("users", "username", username));
            }
            if row.email == email {
                return Err(AppError::duplicate("users", "email", email));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        Self::ensure_unique(&rows, None, &new_user.username, &new_user.email)?;

        let stamp = now();
        let user = User {
            id: rows.len() as i32 + 1,
            username: new_user.username,
            email: new_user.email,
            password: new_user.password,
            name: new_user.name,
            created_at: stamp.clone(),
            updated_at: stamp,
            deleted_at: None,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        Ok(self.live().into_iter().find(|u| u.id == user_id))
    }

    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        Ok(self.live().into_iter().find(|u| u.email == user_email))
    }

    async fn find_by_username(&self, user_name: &str) -> AppResult<Option<User>> {
        Ok(self.live().into_iter().find(|u| u.username == user_name))
    }

    async fn update(&self, user_id: i32, changes: UpdateUser) -> AppResult<Option<User>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(index) = rows
            .iter()
            .position(|u| u.id == user_id && u.deleted_at.is_none())
        else {
            return Ok(None);
        };

        let mut user = rows[index].clone();
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password) = changes.password {
            user.password = password;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        user.updated_at = now();

        Self::ensure_unique(&rows, Some(user_id), &user.username, &user.email)?;
        rows[index] = user.clone();
        Ok(Some(user))
    }

    async fn delete(&self, user_id: i32) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|u| u.id == user_id && u.deleted_at.is_none())
        {
            Some(user) => {
                user.deleted_at = Some(now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        Ok(self.live())
    }
}

pub struct InMemoryPostRepository {
    users: Arc<InMemoryUserRepository>,
    rows: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Arc<Self> {
        Arc::new(Self {
            users,
            rows: Mutex::new(Vec::new()),
        })
    }

    fn with_author(&self, post: Post) -> Option<PostWithAuthor> {
        let author = self.users.any_by_id(post.author_id)?;
        Some(PostWithAuthor { post, author })
    }

    fn live_newest_first(&self) -> Vec<Post> {
        let mut live: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.deleted_at.is_none())
            .cloned()
            .collect();
        live.sort_by(|a, b| b.id.cmp(&a.id));
        live
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> AppResult<Post> {
        if self.users.any_by_id(new_post.author_id).is_none() {
            return Err(AppError::validation(
                "author_id",
                format!(
                    "Invalid reference from posts with value '{}'",
                    new_post.author_id
                ),
            ));
        }

        let mut rows = self.rows.lock().unwrap();
        let stamp = now();
        let post = Post {
            id: rows.len() as i32 + 1,
            title: new_post.title,
            content: new_post.content,
            author_id: new_post.author_id,
            created_at: stamp.clone(),
            updated_at: stamp,
            deleted_at: None,
        };
        rows.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, post_id: i32) -> AppResult<Option<PostWithAuthor>> {
        Ok(self
            .live_newest_first()
            .into_iter()
            .find(|p| p.id == post_id)
            .and_then(|p| self.with_author(p)))
    }

    async fn find_by_author(&self, author_id: i32) -> AppResult<Vec<PostWithAuthor>> {
        Ok(self
            .live_newest_first()
            .into_iter()
            .filter(|p| p.author_id == author_id)
            .filter_map(|p| self.with_author(p))
            .collect())
    }

    async fn update(&self, post_id: i32, changes: UpdatePost) -> AppResult<Option<Post>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(post) = rows
            .iter_mut()
            .find(|p| p.id == post_id && p.deleted_at.is_none())
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        post.updated_at = now();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, post_id: i32) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|p| p.id == post_id && p.deleted_at.is_none())
        {
            Some(post) => {
                post.deleted_at = Some(now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> AppResult<Vec<PostWithAuthor>> {
        Ok(self
            .live_newest_first()
            .into_iter()
            .filter_map(|p| self.with_author(p))
            .collect())
    }
}
