//! Router fixture over in-memory repositories.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::{PostHandler, UserHandler};
use crate::api::middleware::{ACTOR_HEADER, actor_middleware};
use crate::api::routes::create_router;
use crate::config::Settings;
use crate::db::lazy_connection_pool;
use crate::repositories::memory::{InMemoryPostRepository, InMemoryUserRepository};
use crate::routing::{AutoRouter, RouteTable};
use crate::services::{PostService, UserService};
use crate::state::AppState;

pub struct TestApp {
    pub table: RouteTable,
    pub settings: Settings,
}

impl TestApp {
    pub fn new() -> Self {
        let users = InMemoryUserRepository::new();
        let posts = InMemoryPostRepository::new(Arc::clone(&users));

        let user_handler = Arc::new(UserHandler::new(Arc::new(UserService::new(users))));
        let post_handler = Arc::new(PostHandler::new(Arc::new(PostService::new(posts))));

        let table = AutoRouter::new()
            .register_handler("/users", user_handler)
            .register_handler_with("/posts", post_handler, actor_middleware())
            .build();

        let mut settings = Settings::default();
        settings.routing.api_prefix = "/".to_string();

        Self { table, settings }
    }

    /// Sends one request through the full router. Empty bodies come back as
    /// `Value::Null`.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        actor: Option<i64>,
    ) -> (StatusCode, Value) {
        let state = AppState::new(
            lazy_connection_pool(&self.settings.database),
            self.table.clone(),
            &self.settings.routing,
        );
        let router = create_router(state, &self.settings).unwrap();

        let mut request = Request::builder().method(method).uri(uri);
        if let Some(actor) = actor {
            request = request.header(ACTOR_HEADER, actor.to_string());
        }
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

pub fn user_body(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "secret123",
        "name": "Test User",
    })
}
