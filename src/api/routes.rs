//! Router configuration for the API.
//!
//! Static endpoints (health, diagnostics, OpenAPI) are declared here; the
//! domain endpoints come from the route table built by the container.

use axum::{Router, extract::DefaultBodyLimit, http::StatusCode, middleware, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::api::handlers::{health::health_routes, routes};
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::config::Settings;
use crate::routing::RoutingError;
use crate::state::AppState;

/// Creates the main application router.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. CORS and compression
/// 2. Request ID - generates or propagates `x-request-id`
/// 3. Logging - one span per request, tagged with the request ID
/// 4. Error normalization - every error body becomes an `ErrorResponse`
///
/// # Routes
/// - `{api_prefix}/users`, `{api_prefix}/posts` - auto-routed handlers
/// - `/health`, `/health/ready`, `/health/live`
/// - `/debug/routes` - route manifest, when `routing.expose_manifest` is set
/// - `/api-docs/openapi.json`
///
/// # Errors
/// Fails when the route table has collisions and the policy is `strict`.
pub fn create_router(state: AppState, settings: &Settings) -> Result<Router, RoutingError> {
    let routing = &settings.routing;
    let api_routes = state
        .routes
        .mount(Router::new(), routing.collision_policy)?;

    let mut router = Router::new()
        .merge(health_routes())
        .route("/api-docs/openapi.json", get(routes::openapi_json));

    if routing.expose_manifest {
        router = router.route("/debug/routes", get(routes::route_manifest));
    }

    // axum refuses to nest at the root.
    router = if routing.api_prefix == "/" {
        router.merge(api_routes)
    } else {
        router.nest(&routing.api_prefix, api_routes)
    };

    Ok(router
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(DefaultBodyLimit::max(settings.server.body_limit))
        // Middleware is applied in reverse order - last added runs first
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state))
}
