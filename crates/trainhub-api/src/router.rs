//! Route definitions for the TrainHub HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with every route bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(embed_routes())
        .merge(session_routes())
        .merge(validation_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(
            crate::middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Health checks (no auth)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::detailed_health))
}

/// Moodle bridge and current actor
fn embed_routes() -> Router<AppState> {
    Router::new()
        .route("/embed/token", post(handlers::embed::issue_token))
        .route("/me", get(handlers::me::me))
}

/// Session CRUD and audit trail
fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions",
            get(handlers::sessions::list_sessions).post(handlers::sessions::create_session),
        )
        .route("/sessions/{id}", get(handlers::sessions::get_session))
        .route(
            "/sessions/{id}/audit",
            get(handlers::sessions::session_audit),
        )
}

/// Gate decisions and queue
fn validation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions/{id}/validate",
            post(handlers::validation::validate_session),
        )
        .route("/validations/pending", get(handlers::validation::pending))
}
