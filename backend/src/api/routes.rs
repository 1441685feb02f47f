//! Route definitions for the API.

use axum::{extract::DefaultBodyLimit, middleware, Router};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers;
use super::middleware::tracing::correlation_id_middleware;
use super::SharedState;

/// Editor documents are the largest bodies accepted.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Create the main API router
pub fn create_router(state: SharedState) -> Router {
    let openapi = super::openapi::build_openapi();

    Router::new()
        .merge(handlers::health::router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", openapi))
        .nest("/api", public_routes())
        .nest("/api/core", admin_routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(correlation_id_middleware))
        .with_state(state)
}

/// Reader-facing routes: published content and image read-through.
fn public_routes() -> Router<SharedState> {
    Router::new()
        .merge(handlers::editions::router())
        .merge(handlers::articles::router())
        .merge(handlers::categories::router())
        .merge(handlers::images::router())
        .merge(handlers::announcements::public_router())
}

/// Editorial routes.
fn admin_routes() -> Router<SharedState> {
    Router::new()
        .merge(handlers::admin_editions::router())
        .merge(handlers::admin_articles::router())
        .merge(handlers::covers::router())
        .merge(handlers::writers::router())
        .merge(handlers::announcements::router())
}
