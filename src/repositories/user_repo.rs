//! User persistence.
//!
//! Deletion is soft: rows get `deleted_at` and vanish from every query here.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::now;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>>;

    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>>;

    async fn find_by_username(&self, user_name: &str) -> AppResult<Option<User>>;

    /// Applies `changes` to a live user; `None` when no live row matched.
    async fn update(&self, user_id: i32, changes: UpdateUser) -> AppResult<Option<User>>;

    /// Soft-deletes a live user; `false` when no live row matched.
    async fn delete(&self, user_id: i32) -> AppResult<bool>;

    /// Live users ordered by id
    async fn list_all(&self) -> AppResult<Vec<User>>;
}

/// Cloning is cheap: the bb8 pool is reference counted.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: AsyncDbPool,
}

impl PgUserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let user = diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let user = users
            .filter(id.eq(user_id))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let user = users
            .filter(email.eq(user_email))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn find_by_username(&self, user_name: &str) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let user = users
            .filter(username.eq(user_name))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn update(&self, user_id: i32, mut changes: UpdateUser) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        changes.updated_at = Some(now());
        let user = diesel::update(users.filter(id.eq(user_id)).filter(deleted_at.is_null()))
            .set(&changes)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn delete(&self, user_id: i32) -> AppResult<bool> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let affected = diesel::update(users.filter(id.eq(user_id)).filter(deleted_at.is_null()))
            .set(deleted_at.eq(Some(now())))
            .execute(&mut conn)
            .await?;
        Ok(affected > 0)
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let rows = users
            .filter(deleted_at.is_null())
            .order(id.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows)
    }
}
