//! Audit trail service.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use trainhub_auth::rbac::{RbacEnforcer, SystemPermission};
use trainhub_core::result::AppResult;
use trainhub_database::store::AuditStore;
use trainhub_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry};
use trainhub_entity::session::SessionChange;

use crate::context::RequestContext;

/// Records session changes and serves the audit trail.
///
/// Recording is best-effort: a store failure is logged and swallowed so it
/// never undoes or fails the change it describes.
#[derive(Debug, Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
    rbac: Arc<RbacEnforcer>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(store: Arc<dyn AuditStore>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { store, rbac }
    }

    /// Record an applied session change.
    pub async fn record_change(
        &self,
        actor_id: Option<Uuid>,
        session_id: Uuid,
        change: &SessionChange,
    ) {
        self.record(actor_id, change.action, session_id, change.audit_details())
            .await;
    }

    /// Record an arbitrary session action.
    pub async fn record(
        &self,
        actor_id: Option<Uuid>,
        action: AuditAction,
        session_id: Uuid,
        details: serde_json::Value,
    ) {
        let entry = CreateAuditLogEntry::for_session(actor_id, action, session_id, details);
        if let Err(e) = self.store.append(&entry).await {
            warn!(
                session_id = %session_id,
                action = %action,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    /// The audit trail of one session, oldest first.
    pub async fn session_trail(
        &self,
        ctx: &RequestContext,
        session_id: Uuid,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.rbac
            .require_permission(&ctx.role(), &SystemPermission::AuditView)?;
        self.store.find_by_target("session", session_id).await
    }
}
