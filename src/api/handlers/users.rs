//! User request handlers.
//!
//! `UserHandler` exposes its operations by name; the auto router maps them
//! onto `/users`:
//!
//! - `CreateUser`      POST   /users
//! - `GetUser`         GET    /users/{id}
//! - `GetAllUsers`     GET    /users
//! - `UpdateUser`      PUT    /users/{id}
//! - `DeleteUser`      DELETE /users/{id}
//! - `GetUserProfile`  GET    /users/{id}/profile
//! - `ChangePassword`  PUT    /users/{id}/password

use std::sync::Arc;

use axum::{Json, http::StatusCode};

use crate::api::dto::{
    ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserProfileResponse,
    UserResponse,
};
use crate::error::{AppError, AppResult};
use crate::route_operations;
use crate::routing::{Operation, RequestContext, RouteHandler};
use crate::services::UserService;

pub struct UserHandler {
    service: Arc<UserService>,
}

impl UserHandler {
    pub fn new(service: Arc<UserService>) -> Self {
        Self { service }
    }

    async fn create_user(&self, ctx: RequestContext) -> AppResult<(StatusCode, Json<UserResponse>)> {
        let payload: CreateUserRequest = ctx.valid_json()?;
        let user = self.service.create_user(payload.into_new_user()).await?;
        Ok((StatusCode::CREATED, Json(user.into())))
    }

    async fn get_user(&self, ctx: RequestContext) -> AppResult<Json<UserResponse>> {
        let id = ctx.path_id("user")?;
        let user = self.service.get_user(id).await?;
        Ok(Json(user.into()))
    }

    async fn list_users(&self, _ctx: RequestContext) -> AppResult<Json<Vec<UserResponse>>> {
        let users = self.service.list_users().await?;
        Ok(Json(users.into_iter().map(UserResponse::from).collect()))
    }

    async fn update_user(&self, ctx: RequestContext) -> AppResult<Json<UserResponse>> {
        let id = ctx.path_id("user")?;
        let payload: UpdateUserRequest = ctx.valid_json()?;

        let changes = payload.into_update_user();
        if changes.is_empty() {
            return Err(AppError::bad_request("No fields to update"));
        }

        let user = self.service.update_user(id, changes).await?;
        Ok(Json(user.into()))
    }

    async fn delete_user(&self, ctx: RequestContext) -> AppResult<StatusCode> {
        let id = ctx.path_id("user")?;
        if !self.service.delete_user(id).await? {
            return Err(AppError::not_found("user", "id", id));
        }
        Ok(StatusCode::NO_CONTENT)
    }

    async fn get_user_profile(&self, ctx: RequestContext) -> AppResult<Json<UserProfileResponse>> {
        let id = ctx.path_id("user")?;
        let user = self.service.get_user(id).await?;
        Ok(Json(user.into()))
    }

    async fn change_password(&self, ctx: RequestContext) -> AppResult<StatusCode> {
        let id = ctx.path_id("user")?;
        let payload: ChangePasswordRequest = ctx.valid_json()?;
        self.service
            .change_password(id, &payload.current_password, &payload.new_password)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}

impl RouteHandler for UserHandler {
    fn handler_name(&self) -> &'static str {
        "UserHandler"
    }

    fn operations(self: Arc<Self>) -> Vec<Operation> {
        route_operations!(self;
            "CreateUser" => create_user,
            "GetUser" => get_user,
            "GetAllUsers" => list_users,
            "UpdateUser" => update_user,
            "DeleteUser" => delete_user,
            "GetUserProfile" => get_user_profile,
            "ChangePassword" => change_password,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::{TestApp, user_body};
    use crate::routing::RouteMethod;
    use serde_json::json;

    #[test]
    fn test_operations_bind_to_conventional_routes() {
        let app = TestApp::new();
        let routes: Vec<_> = app
            .table
            .list_routes()
            .into_iter()
            .filter(|r| r.handler == "UserHandler")
            .map(|r| (r.method, r.path))
            .collect();

        assert_eq!(
            routes,
            [
                (RouteMethod::Post, "/users".to_string()),
                (RouteMethod::Get, "/users/{id}".to_string()),
                (RouteMethod::Get, "/users".to_string()),
                (RouteMethod::Put, "/users/{id}".to_string()),
                (RouteMethod::Delete, "/users/{id}".to_string()),
                (RouteMethod::Get, "/users/{id}/profile".to_string()),
                (RouteMethod::Put, "/users/{id}/password".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let app = TestApp::new();
        let (status, created) = app.send("POST", "/users", Some(user_body("alice")), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["username"], "alice");
        assert!(created.get("password").is_none());

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = app.send("GET", &format!("/users/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["email"], "alice@example.com");

        let (status, profile) = app.send("GET", &format!("/users/{id}/profile"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["username"], "alice");
        assert!(profile.get("email").is_none());

        let (status, all) = app.send("GET", "/users", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_user_errors() {
        let app = TestApp::new();
        app.send("POST", "/users", Some(user_body("alice")), None).await;

        let (status, body) = app.send("POST", "/users", Some(user_body("alice")), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_ENTRY");

        let bad = json!({"username": "a b", "email": "x", "password": "1", "name": "A"});
        let (status, body) = app.send("POST", "/users", Some(bad), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_invalid_id_and_missing_user() {
        let app = TestApp::new();
        let (status, body) = app.send("GET", "/users/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid user ID");

        let (status, body) = app.send("DELETE", "/users/99", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let app = TestApp::new();
        let (_, created) = app.send("POST", "/users", Some(user_body("alice")), None).await;
        let path = format!("/users/{}", created["id"]);

        let (status, updated) = app
            .send("PUT", &path, Some(json!({"name": "Alice Liddell"})), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Alice Liddell");
        assert_eq!(updated["username"], "alice");

        let (status, _) = app.send("PUT", &path, Some(json!({})), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.send("DELETE", &path, None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send("GET", &path, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_change_password() {
        let app = TestApp::new();
        let (_, created) = app.send("POST", "/users", Some(user_body("alice")), None).await;
        let path = format!("/users/{}/password", created["id"]);

        let wrong = json!({"current_password": "nope", "new_password": "another1"});
        let (status, body) = app.send("PUT", &path, Some(wrong), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let right = json!({"current_password": "secret123", "new_password": "another1"});
        let (status, _) = app.send("PUT", &path, Some(right), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
