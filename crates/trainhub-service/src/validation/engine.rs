//! Validation engine: decides and applies gate transitions.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use trainhub_core::error::{AppError, ErrorKind};
use trainhub_core::result::AppResult;
use trainhub_database::store::SessionStore;
use trainhub_entity::session::{Decision, Gate, Session, Transition, legal_gates};
use trainhub_entity::user::Actor;

use crate::audit::AuditService;

/// One gate decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Target session.
    pub session_id: Uuid,
    /// Gate being exercised.
    pub gate: Gate,
    /// Approve or reject.
    pub decision: Decision,
    /// Version the caller last saw; defaults to the version read here.
    pub expected_version: Option<i64>,
    /// Free-text reason, kept on rejection.
    pub reason: Option<String>,
}

/// Applies validation gate decisions.
///
/// Every call reads the session, plans the transition against the actor's
/// role and the current status, then issues one write conditioned on the
/// session version.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    store: Arc<dyn SessionStore>,
    audit: AuditService,
}

impl ValidationEngine {
    /// Creates a new validation engine.
    pub fn new(store: Arc<dyn SessionStore>, audit: AuditService) -> Self {
        Self { store, audit }
    }

    /// Decide a gate for `actor` and persist the result.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the session does not exist.
    /// * `Authorization` if the actor's role does not own the gate.
    /// * `InvalidTransition` if the session is not waiting for the gate.
    /// * `Conflict` if the session changed since `expected_version`.
    /// * `Database` if the store fails; the session is unchanged.
    pub async fn validate(&self, actor: &Actor, request: ValidationRequest) -> AppResult<Session> {
        let ValidationRequest {
            session_id,
            gate,
            decision,
            expected_version,
            reason,
        } = request;

        let session = self
            .store
            .find_by_id(session_id)
            .await
            .inspect_err(|e| log_store_failure(session_id, e))?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;

        let version = expected_version.unwrap_or(session.version);
        if version != session.version {
            warn!(
                session_id = %session_id,
                actor_id = %actor.id,
                expected = version,
                current = session.version,
                "Stale validation request"
            );
            return Err(AppError::conflict(format!(
                "Session {session_id} was modified (expected version {version}, current {})",
                session.version
            )));
        }

        let change = Transition::plan(&session, gate, decision, actor, reason, Utc::now())
            .inspect_err(|e| {
                warn!(
                    session_id = %session_id,
                    actor_id = %actor.id,
                    role = %actor.role,
                    gate = %gate,
                    status = %session.status,
                    error = %e,
                    "Validation refused"
                );
            })?;

        let updated = self
            .store
            .apply_change(session_id, version, &change)
            .await
            .inspect_err(|e| match e.kind {
                ErrorKind::Conflict | ErrorKind::NotFound => warn!(
                    session_id = %session_id,
                    actor_id = %actor.id,
                    error = %e,
                    "Validation lost a concurrent update"
                ),
                _ => log_store_failure(session_id, e),
            })?;

        info!(
            session_id = %session_id,
            actor_id = %actor.id,
            gate = %gate,
            from = %change.from,
            to = %change.to,
            version = updated.version,
            "Session validation applied"
        );
        self.audit
            .record_change(Some(actor.id.into_uuid()), session_id, &change)
            .await;

        Ok(updated)
    }

    /// The gates `actor` may exercise on `session` right now.
    pub fn legal_actions(&self, session: &Session, actor: &Actor) -> Vec<Gate> {
        legal_gates(session, actor)
    }
}

fn log_store_failure(session_id: Uuid, e: &AppError) {
    error!(session_id = %session_id, error = %e, "Session store failure during validation");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use trainhub_auth::rbac::RbacEnforcer;
    use trainhub_core::types::UserId;
    use trainhub_database::Stores;
    use trainhub_database::store::AuditStore;
    use trainhub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
    use trainhub_entity::session::{CreateSession, SessionKind, SessionStatus};
    use trainhub_entity::user::UserRole;

    struct Fixture {
        stores: Stores,
        engine: ValidationEngine,
    }

    fn fixture() -> Fixture {
        let stores = Stores::memory();
        let audit = AuditService::new(stores.audit.clone(), Arc::new(RbacEnforcer::new()));
        let engine = ValidationEngine::new(stores.sessions.clone(), audit);
        Fixture { stores, engine }
    }

    async fn seed(f: &Fixture, kind: SessionKind) -> Session {
        let start = Utc::now() + Duration::days(2);
        f.stores
            .sessions
            .create(&CreateSession {
                title: "Sauveteur secouriste".into(),
                kind,
                start_time: start,
                end_time: start + Duration::hours(7),
                location: None,
                capacity: None,
                trainer_id: None,
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap()
    }

    fn actor(role: UserRole) -> Actor {
        Actor::new(UserId::new(), role.as_str(), role)
    }

    fn request(session: &Session, gate: Gate, approve: bool) -> ValidationRequest {
        ValidationRequest {
            session_id: session.id,
            gate,
            decision: approve.into(),
            expected_version: None,
            reason: None,
        }
    }

    #[tokio::test]
    async fn test_two_gate_flow_with_audit() {
        let f = fixture();
        let s = seed(&f, SessionKind::Hse).await;
        let hr = actor(UserRole::Hr);
        let hse = actor(UserRole::Hse);

        let after_hr = f.engine.validate(&hr, request(&s, Gate::Hr, true)).await.unwrap();
        assert_eq!(after_hr.status, SessionStatus::AwaitingHse);
        assert_eq!(f.engine.legal_actions(&after_hr, &hse), vec![Gate::Hse]);

        let done = f.engine.validate(&hse, request(&s, Gate::Hse, true)).await.unwrap();
        assert_eq!(done.status, SessionStatus::ValidatedHse);
        assert_eq!(done.validated_hr_by, Some(hr.id.into_uuid()));
        assert_eq!(done.validated_hse_by, Some(hse.id.into_uuid()));
        assert!(f.engine.legal_actions(&done, &hse).is_empty());

        let trail = f.stores.audit.find_by_target("session", s.id).await.unwrap();
        let actions: Vec<_> = trail.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["session.validate_hr", "session.validate_hse"]);
    }

    #[tokio::test]
    async fn test_wrong_role_writes_nothing() {
        let f = fixture();
        let s = seed(&f, SessionKind::Metier).await;

        let err = f
            .engine
            .validate(&actor(UserRole::Manager), request(&s, Gate::Hr, true))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let unchanged = f.stores.sessions.find_by_id(s.id).await.unwrap().unwrap();
        assert_eq!(unchanged.version, 1);
        assert_eq!(unchanged.status, SessionStatus::Planned);
    }

    #[tokio::test]
    async fn test_repeat_approval_is_invalid_transition() {
        let f = fixture();
        let s = seed(&f, SessionKind::Metier).await;
        let hr = actor(UserRole::Hr);

        let first = f.engine.validate(&hr, request(&s, Gate::Hr, true)).await.unwrap();
        let err = f
            .engine
            .validate(&hr, request(&s, Gate::Hr, true))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition);

        let current = f.stores.sessions.find_by_id(s.id).await.unwrap().unwrap();
        assert_eq!(current.validated_hr_at, first.validated_hr_at);
        assert_eq!(current.version, 2);
    }

    #[tokio::test]
    async fn test_stale_version_conflicts() {
        let f = fixture();
        let s = seed(&f, SessionKind::Hse).await;
        f.engine
            .validate(&actor(UserRole::Hr), request(&s, Gate::Hr, true))
            .await
            .unwrap();

        let stale = ValidationRequest {
            expected_version: Some(1),
            ..request(&s, Gate::Hse, false)
        };
        let err = f.engine.validate(&actor(UserRole::Hse), stale).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(
            f.stores.sessions.find_by_id(s.id).await.unwrap().unwrap().status,
            SessionStatus::AwaitingHse
        );
    }

    #[tokio::test]
    async fn test_reject_records_reason() {
        let f = fixture();
        let s = seed(&f, SessionKind::Metier).await;
        let drh = actor(UserRole::Drh);

        let rejected = f
            .engine
            .validate(
                &drh,
                ValidationRequest {
                    reason: Some("Budget gelé".into()),
                    ..request(&s, Gate::Hr, false)
                },
            )
            .await
            .unwrap();
        assert_eq!(rejected.status, SessionStatus::Cancelled);
        assert_eq!(rejected.cancelled_by, Some(drh.id.into_uuid()));
        assert!(rejected.validated_hr_at.is_none());

        let trail = f.stores.audit.find_by_target("session", s.id).await.unwrap();
        assert_eq!(trail[0].action, "session.reject_hr");
        assert_eq!(trail[0].details.as_ref().unwrap()["reason"], "Budget gelé");
    }

    #[derive(Debug)]
    struct BrokenAudit;

    #[async_trait]
    impl AuditStore for BrokenAudit {
        async fn append(&self, _entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
            Err(AppError::database("audit_logs is unavailable"))
        }

        async fn find_by_target(
            &self,
            _target_type: &str,
            _target_id: Uuid,
        ) -> AppResult<Vec<AuditLogEntry>> {
            Err(AppError::database("audit_logs is unavailable"))
        }
    }

    #[tokio::test]
    async fn test_audit_failure_keeps_the_transition() {
        let stores = Stores::memory();
        let audit = AuditService::new(Arc::new(BrokenAudit), Arc::new(RbacEnforcer::new()));
        let engine = ValidationEngine::new(stores.sessions.clone(), audit);
        let f = Fixture { stores, engine };
        let s = seed(&f, SessionKind::Hse).await;

        let updated = f
            .engine
            .validate(&actor(UserRole::Hr), request(&s, Gate::Hr, true))
            .await
            .unwrap();
        assert_eq!(updated.status, SessionStatus::AwaitingHse);
        assert_eq!(updated.version, 2);

        let stored = f.stores.sessions.find_by_id(s.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::AwaitingHse);
        assert_eq!(stored.version, 2);
        assert!(stored.validated_hr_at.is_some());
    }

    #[tokio::test]
    async fn test_missing_session() {
        let f = fixture();
        let err = f
            .engine
            .validate(
                &actor(UserRole::Hr),
                ValidationRequest {
                    session_id: Uuid::new_v4(),
                    gate: Gate::Hr,
                    decision: Decision::Approve,
                    expected_version: None,
                    reason: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
