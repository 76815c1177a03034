//! Session entity accessor: fetch, list and create training sessions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use trainhub_auth::rbac::{RbacEnforcer, SystemPermission};
use trainhub_core::error::AppError;
use trainhub_core::result::AppResult;
use trainhub_core::types::pagination::{PageRequest, PageResponse};
use trainhub_database::store::SessionStore;
use trainhub_entity::audit::AuditAction;
use trainhub_entity::session::{CreateSession, Session, SessionKind, SessionStatus};

use crate::audit::AuditService;
use crate::context::RequestContext;

/// Maximum title length, in characters.
const MAX_TITLE_CHARS: usize = 255;

/// Input for creating a training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    /// Descriptive title.
    pub title: String,
    /// Session kind.
    pub kind: SessionKind,
    /// Scheduled start.
    pub start_time: DateTime<Utc>,
    /// Scheduled end.
    pub end_time: DateTime<Utc>,
    /// Location.
    pub location: Option<String>,
    /// Capacity.
    pub capacity: Option<i32>,
    /// Trainer.
    pub trainer_id: Option<Uuid>,
}

impl NewSession {
    fn validate(&self) -> AppResult<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title must not be empty"));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::validation(format!(
                "Title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        if self.end_time <= self.start_time {
            return Err(AppError::validation("end_time must be after start_time"));
        }
        if matches!(self.capacity, Some(c) if c < 1) {
            return Err(AppError::validation("capacity must be at least 1"));
        }
        Ok(())
    }
}

/// Session access service.
#[derive(Debug, Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    audit: AuditService,
    rbac: Arc<RbacEnforcer>,
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(store: Arc<dyn SessionStore>, audit: AuditService, rbac: Arc<RbacEnforcer>) -> Self {
        Self { store, audit, rbac }
    }

    /// Fetch a session by ID.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Session> {
        self.rbac
            .require_permission(&ctx.role(), &SystemPermission::SessionRead)?;
        self.find(id).await
    }

    /// Fetch a session by ID without a permission check.
    pub async fn find(&self, id: Uuid) -> AppResult<Session> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {id} not found")))
    }

    /// List sessions in the given statuses (all when empty), by start time.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        statuses: &[SessionStatus],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Session>> {
        self.rbac
            .require_permission(&ctx.role(), &SystemPermission::SessionRead)?;
        self.store.list(statuses, page).await
    }

    /// Create a session in `planned`. HR-class actors only.
    pub async fn create(&self, ctx: &RequestContext, input: NewSession) -> AppResult<Session> {
        self.rbac
            .require_permission(&ctx.role(), &SystemPermission::SessionCreate)?;
        input.validate()?;

        let session = self
            .store
            .create(&CreateSession {
                title: input.title.trim().to_string(),
                kind: input.kind,
                start_time: input.start_time,
                end_time: input.end_time,
                location: input.location,
                capacity: input.capacity,
                trainer_id: input.trainer_id,
                created_by: ctx.user_id(),
            })
            .await?;

        info!(
            session_id = %session.id,
            actor_id = %ctx.actor.id,
            kind = %session.kind,
            "Training session created"
        );
        self.audit
            .record(
                Some(ctx.user_id()),
                AuditAction::Create,
                session.id,
                serde_json::json!({ "title": session.title, "kind": session.kind }),
            )
            .await;

        Ok(session)
    }
}
