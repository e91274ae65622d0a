//! Route definitions for the API.

use axum::{routing::get, Router};
use tower_http::services::ServeDir;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers;
use super::SharedState;

/// Create the main API router
pub fn create_router(state: SharedState) -> Router {
    // Build OpenAPI spec once at startup
    let openapi = super::openapi::build_openapi();

    // The console assets are the fallback so API routes always win.
    let console = ServeDir::new(&state.config.static_dir);

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/livez", get(handlers::health::liveness_check))
        // OpenAPI spec and Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", openapi))
        // Entity routes
        .nest("/permissions", handlers::permissions::router())
        .nest("/roles", handlers::roles::router())
        .nest("/users", handlers::users::router())
        // Static console (Users / Roles / Permissions views)
        .fallback_service(console)
        .with_state(state)
}
