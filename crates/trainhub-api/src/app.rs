//! Application builder: wires router, middleware and state into an Axum app.

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server = state.config.server.clone();

    build_router(state)
        .layer(build_compression_layer())
        .layer(build_cors_layer(&server.cors))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http())
}
