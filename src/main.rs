//! TrainHub Server: training session validation workflow.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use trainhub_api::{AppState, build_app};
use trainhub_core::config::AppConfig;
use trainhub_core::error::AppError;
use trainhub_worker::ProgressionRunner;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `{dir}/default.toml`, the `{dir}/{env}.toml` overlay, and
/// `TRAINHUB__*` environment overrides.
fn load_configuration() -> Result<AppConfig, AppError> {
    let dir = std::env::var("TRAINHUB_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("TRAINHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TrainHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores ───────────────────────────────────────────
    let stores = trainhub_database::store::open(&config.database).await?;

    // ── Step 2: Services and router ──────────────────────────────
    let bind_address = config.server.bind_address();
    let shutdown_grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let worker_config = config.worker.clone();
    let state = AppState::new(config, stores);

    // ── Step 3: Progression worker ───────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_handle = if worker_config.enabled {
        let runner = ProgressionRunner::new(Arc::clone(&state.schedule_service), worker_config);
        Some(tokio::spawn(async move { runner.run(shutdown_rx).await }))
    } else {
        tracing::info!("Progression worker disabled");
        None
    };

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_address}: {e}")))?;
    tracing::info!(address = %bind_address, "HTTP server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server failed: {e}")));

    // ── Step 5: Drain the worker ─────────────────────────────────
    let _ = shutdown_tx.send(true);
    if let Some(handle) = worker_handle {
        if tokio::time::timeout(shutdown_grace, handle).await.is_err() {
            tracing::warn!("Progression worker did not stop within the grace period");
        }
    }

    tracing::info!("TrainHub stopped");
    served
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
