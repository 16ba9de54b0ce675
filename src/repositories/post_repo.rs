//! Post persistence. Every read joins the author row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{NewPost, Post, PostWithAuthor, UpdatePost, User};
use crate::repositories::now;
use crate::schema::{posts, users};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, new_post: NewPost) -> AppResult<Post>;

    async fn find_by_id(&self, post_id: i32) -> AppResult<Option<PostWithAuthor>>;

    /// Live posts written by `author_id`, newest id first
    async fn find_by_author(&self, author_id: i32) -> AppResult<Vec<PostWithAuthor>>;

    async fn update(&self, post_id: i32, changes: UpdatePost) -> AppResult<Option<Post>>;

    async fn delete(&self, post_id: i32) -> AppResult<bool>;

    /// Live posts, newest id first
    async fn list_all(&self) -> AppResult<Vec<PostWithAuthor>>;
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: AsyncDbPool,
}

impl PgPostRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, new_post: NewPost) -> AppResult<Post> {
        let mut conn = self.pool.get().await?;

        let post = diesel::insert_into(posts::table)
            .values(&new_post)
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(post)
    }

    async fn find_by_id(&self, post_id: i32) -> AppResult<Option<PostWithAuthor>> {
        let mut conn = self.pool.get().await?;

        let row = posts::table
            .inner_join(users::table)
            .filter(posts::id.eq(post_id))
            .filter(posts::deleted_at.is_null())
            .select((Post::as_select(), User::as_select()))
            .first::<(Post, User)>(&mut conn)
            .await
            .optional()?;
        Ok(row.map(PostWithAuthor::from))
    }

    async fn find_by_author(&self, author_id: i32) -> AppResult<Vec<PostWithAuthor>> {
        let mut conn = self.pool.get().await?;

        let rows = posts::table
            .inner_join(users::table)
            .filter(posts::author_id.eq(author_id))
            .filter(posts::deleted_at.is_null())
            .order(posts::id.desc())
            .select((Post::as_select(), User::as_select()))
            .load::<(Post, User)>(&mut conn)
            .await?;
        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    async fn update(&self, post_id: i32, mut changes: UpdatePost) -> AppResult<Option<Post>> {
        let mut conn = self.pool.get().await?;

        changes.updated_at = Some(now());
        let post = diesel::update(
            posts::table
                .filter(posts::id.eq(post_id))
                .filter(posts::deleted_at.is_null()),
        )
        .set(&changes)
        .returning(Post::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;
        Ok(post)
    }

    async fn delete(&self, post_id: i32) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        let affected = diesel::update(
            posts::table
                .filter(posts::id.eq(post_id))
                .filter(posts::deleted_at.is_null()),
        )
        .set(posts::deleted_at.eq(Some(now())))
        .execute(&mut conn)
        .await?;
        Ok(affected > 0)
    }

    async fn list_all(&self) -> AppResult<Vec<PostWithAuthor>> {
        let mut conn = self.pool.get().await?;

        let rows = posts::table
            .inner_join(users::table)
            .filter(posts::deleted_at.is_null())
            .order(posts::id.desc())
            .select((Post::as_select(), User::as_select()))
            .load::<(Post, User)>(&mut conn)
            .await?;
        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }
}
