//! HTTP router construction.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/filters", get(api::filters))
        // The map frontend POSTs with the parameters in the query string.
        .route("/search", get(api::search).post(api::search))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
