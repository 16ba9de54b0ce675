//! Post request handlers.
//!
//! `PostHandler` is registered under `/posts` together with the actor
//! middleware, so every operation sees the `x-user-id` caller in
//! `RequestContext::actor`. Update and delete require it.
//!
//! `GetPostsByAuthor` follows the generic `Get*` rule and therefore shares
//! `GET /posts/{id}` with `GetPost`, which is registered first and served.
//! Listing by author over HTTP goes through `GET /posts?author_id=N`.

use std::sync::Arc;

use axum::{Json, http::StatusCode};

use crate::api::dto::{CreatePostRequest, PostListResponse, PostResponse, UpdatePostRequest};
use crate::error::{AppError, AppResult};
use crate::route_operations;
use crate::routing::{Operation, RequestContext, RouteHandler};
use crate::services::PostService;

pub struct PostHandler {
    service: Arc<PostService>,
}

impl PostHandler {
    pub fn new(service: Arc<PostService>) -> Self {
        Self { service }
    }

    async fn create_post(&self, ctx: RequestContext) -> AppResult<(StatusCode, Json<PostResponse>)> {
        let payload: CreatePostRequest = ctx.valid_json()?;
        if ctx.actor.is_some_and(|actor| actor != payload.author_id) {
            return Err(AppError::forbidden("cannot create a post on behalf of another user"));
        }

        let post = self.service.create_post(payload.into_new_post()).await?;
        Ok((StatusCode::CREATED, Json(post.into())))
    }

    async fn get_post(&self, ctx: RequestContext) -> AppResult<Json<PostResponse>> {
        let id = ctx.path_id("post")?;
        let post = self.service.get_post(id).await?;
        Ok(Json(post.into()))
    }

    async fn list_posts(&self, ctx: RequestContext) -> AppResult<Json<Vec<PostListResponse>>> {
        let posts = match ctx.query_param("author_id") {
            Some(raw) => self.service.list_posts_by_author(parse_author_id(raw)?).await?,
            None => self.service.list_posts().await?,
        };
        Ok(Json(posts.into_iter().map(PostListResponse::from).collect()))
    }

    async fn update_post(&self, ctx: RequestContext) -> AppResult<Json<PostResponse>> {
        let id = ctx.path_id("post")?;
        let actor = ctx.actor()?;
        let payload: UpdatePostRequest = ctx.valid_json()?;

        if payload.title.is_none() && payload.content.is_none() {
            return Err(AppError::bad_request("No fields to update"));
        }

        let post = self
            .service
            .update_post(id, actor, payload.into_update_post())
            .await?;
        Ok(Json(post.into()))
    }

    async fn delete_post(&self, ctx: RequestContext) -> AppResult<StatusCode> {
        let id = ctx.path_id("post")?;
        let actor = ctx.actor()?;
        self.service.delete_post(id, actor).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    async fn list_posts_by_author(
        &self,
        ctx: RequestContext,
    ) -> AppResult<Json<Vec<PostListResponse>>> {
        let raw = ctx
            .query_param("author_id")
            .ok_or_else(|| AppError::bad_request("author_id query parameter is required"))?;
        let posts = self.service.list_posts_by_author(parse_author_id(raw)?).await?;
        Ok(Json(posts.into_iter().map(PostListResponse::from).collect()))
    }
}

fn parse_author_id(raw: &str) -> AppResult<i32> {
    raw.parse()
        .map_err(|_| AppError::bad_request("Invalid author ID"))
}

impl RouteHandler for PostHandler {
    fn handler_name(&self) -> &'static str {
        "PostHandler"
    }

    fn operations(self: Arc<Self>) -> Vec<Operation> {
        route_operations!(self;
            "CreatePost" => create_post,
            "GetPost" => get_post,
            "GetAllPosts" => list_posts,
            "UpdatePost" => update_post,
            "DeletePost" => delete_post,
            "GetPostsByAuthor" => list_posts_by_author,
        )
    }
}
