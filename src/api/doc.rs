use utoipa::OpenApi;

use crate::routing::RouteTable;

pub const HEALTH_TAG: &str = "Health";
pub const ROUTES_TAG: &str = "Routes";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Postboard",
        description = "Users and posts API with convention-based routing",
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::health::readiness_check,
        crate::api::handlers::health::liveness_check,
        crate::api::handlers::routes::route_manifest,
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::CreateUserRequest,
            crate::api::dto::UpdateUserRequest,
            crate::api::dto::ChangePasswordRequest,
            crate::api::dto::UserResponse,
            crate::api::dto::UserProfileResponse,
            crate::api::dto::CreatePostRequest,
            crate::api::dto::UpdatePostRequest,
            crate::api::dto::PostResponse,
            crate::api::dto::PostListResponse,
        )
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = ROUTES_TAG, description = "Route table diagnostics"),
        (name = "UserHandler", description = "User management endpoints"),
        (name = "PostHandler", description = "Post endpoints; modifications need x-user-id"),
    )
)]
pub struct ApiDoc;

/// The static document plus one operation per mounted route under `prefix`.
pub fn api_doc(table: &RouteTable, prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    table.extend_openapi(&mut doc, prefix);
    doc
}
