//! Health check handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use trainhub_core::config::PersistenceProvider;

use crate::dto::response::{ApiResponse, ComponentHealth, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
///
/// Returns 503 when the store check fails.
pub async fn detailed_health(State(state): State<AppState>) -> impl IntoResponse {
    let provider = match state.config.database.provider {
        PersistenceProvider::Postgres => "postgres",
        PersistenceProvider::Memory => "memory",
    };

    let start = Instant::now();
    let check = state.stores.sessions.health_check().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let store = match check {
        Ok(healthy) => ComponentHealth {
            provider: provider.to_string(),
            healthy,
            latency_ms,
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            ComponentHealth {
                provider: provider.to_string(),
                healthy: false,
                latency_ms,
                error: Some(e.message),
            }
        }
    };

    let status = if store.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = DetailedHealthResponse {
        status: if store.healthy { "ok" } else { "degraded" }.to_string(),
        version: VERSION.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        store,
        worker_enabled: state.config.worker.enabled,
        embed_enabled: state.embed.is_enabled(),
    };

    (status, Json(ApiResponse::ok(body)))
}
