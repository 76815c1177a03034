//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use trainhub_auth::embed::EmbedVerifier;
use trainhub_auth::jwt::{JwtDecoder, JwtEncoder};
use trainhub_auth::rbac::RbacEnforcer;
use trainhub_core::config::AppConfig;
use trainhub_database::Stores;
use trainhub_service::{
    AuditService, ScheduleService, SessionService, ValidationEngine, ValidationQueue,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Session and audit stores
    pub stores: Stores,

    // ── Auth ─────────────────────────────────────────────────
    /// Access token issuer
    pub jwt_encoder: Arc<JwtEncoder>,
    /// Access token verifier
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Role permission checks
    pub rbac: Arc<RbacEnforcer>,
    /// Moodle bridge key check
    pub embed: Arc<EmbedVerifier>,

    // ── Services ─────────────────────────────────────────────
    /// Session access
    pub session_service: Arc<SessionService>,
    /// Gate decisions
    pub validation_engine: Arc<ValidationEngine>,
    /// Pending validations
    pub validation_queue: Arc<ValidationQueue>,
    /// Audit trail
    pub audit_service: Arc<AuditService>,
    /// Clock-driven progression, shared with the worker
    pub schedule_service: Arc<ScheduleService>,
}

impl AppState {
    /// Wire every service on top of the given stores.
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let rbac = Arc::new(RbacEnforcer::new());
        let audit = AuditService::new(stores.audit.clone(), Arc::clone(&rbac));

        Self {
            jwt_encoder: Arc::new(JwtEncoder::new(&config.auth)),
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            embed: Arc::new(EmbedVerifier::new(&config.auth)),
            session_service: Arc::new(SessionService::new(
                stores.sessions.clone(),
                audit.clone(),
                Arc::clone(&rbac),
            )),
            validation_engine: Arc::new(ValidationEngine::new(
                stores.sessions.clone(),
                audit.clone(),
            )),
            validation_queue: Arc::new(ValidationQueue::new(stores.sessions.clone())),
            schedule_service: Arc::new(ScheduleService::new(
                stores.sessions.clone(),
                audit.clone(),
            )),
            audit_service: Arc::new(audit),
            rbac,
            stores,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
