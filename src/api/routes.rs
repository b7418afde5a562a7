//! Route definitions for the API.

use axum::{middleware, routing::get, Router};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers;
use super::middleware::auth::{admin_middleware, auth_middleware};
use super::SharedState;

/// Create the main API router
pub fn create_router(state: SharedState) -> Router {
    // Build OpenAPI spec once at startup
    let openapi = super::openapi::build_openapi();

    // Registration lifecycle routes; the pending listing additionally
    // requires the administrator role.
    let register_routes = handlers::register::router().merge(
        handlers::register::admin_router().route_layer(middleware::from_fn(admin_middleware)),
    );

    let mut api = Router::new().nest("/api/register", register_routes);

    // The git-backed submission workflow can be disabled wholesale; its
    // routes simply do not exist then.
    if state.config.version_control_enabled {
        api = api.nest("/api/submit", handlers::submit::router());
    } else {
        tracing::info!("Version control disabled — submit endpoints not mounted");
    }

    let api = api.route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    Router::new()
        // Health endpoints (no auth required)
        .route("/health", get(handlers::health::health_check))
        .route("/healthz", get(handlers::health::health_check))
        .route("/livez", get(handlers::health::liveness_check))
        // OpenAPI spec and Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", openapi))
        .merge(api)
        .with_state(state)
}
