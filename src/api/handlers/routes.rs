//! Diagnostics over the route table: the manifest and the OpenAPI document.

use axum::{Json, extract::State};
use utoipa::openapi::OpenApi;

use crate::api::doc::{ROUTES_TAG, api_doc};
use crate::api::dto::RouteManifest;
use crate::state::AppState;

/// Route manifest in mount order, with collisions.
#[utoipa::path(
    get,
    path = "/debug/routes",
    responses(
        (status = 200, description = "Auto-routed entries", body = RouteManifest)
    ),
    tag = ROUTES_TAG
)]
pub async fn route_manifest(State(state): State<AppState>) -> Json<RouteManifest> {
    Json(RouteManifest::from_table(&state.routes, &state.api_prefix))
}

/// OpenAPI document covering the static endpoints and every mounted route.
pub async fn openapi_json(State(state): State<AppState>) -> Json<OpenApi> {
    Json(api_doc(&state.routes, &state.api_prefix))
}
