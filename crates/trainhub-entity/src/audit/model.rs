//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// A session was created.
    #[serde(rename = "session.create")]
    Create,
    /// The HR gate passed.
    #[serde(rename = "session.validate_hr")]
    ValidateHr,
    /// The HSE gate passed.
    #[serde(rename = "session.validate_hse")]
    ValidateHse,
    /// Rejected at the HR gate.
    #[serde(rename = "session.reject_hr")]
    RejectHr,
    /// Rejected at the HSE gate.
    #[serde(rename = "session.reject_hse")]
    RejectHse,
    /// The session started.
    #[serde(rename = "session.start")]
    Start,
    /// The session ended.
    #[serde(rename = "session.complete")]
    Complete,
}

impl AuditAction {
    /// Return the dotted action name stored in `audit_log.action`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "session.create",
            Self::ValidateHr => "session.validate_hr",
            Self::ValidateHse => "session.validate_hse",
            Self::RejectHr => "session.reject_hr",
            Self::RejectHse => "session.reject_hse",
            Self::Start => "session.start",
            Self::Complete => "session.complete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable audit log entry recording a session change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The user who performed the action; `None` for the scheduler.
    pub actor_id: Option<Uuid>,
    /// The action that was performed (e.g. `"session.validate_hr"`).
    pub action: String,
    /// The type of target resource, always `"session"` today.
    pub target_type: String,
    /// The target resource ID.
    pub target_id: Option<Uuid>,
    /// Additional details about the action (JSON).
    pub details: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The acting user.
    pub actor_id: Option<Uuid>,
    /// The action performed.
    pub action: AuditAction,
    /// Target resource type.
    pub target_type: String,
    /// Target resource ID.
    pub target_id: Option<Uuid>,
    /// Additional details.
    pub details: Option<serde_json::Value>,
}

impl CreateAuditLogEntry {
    /// An entry targeting a training session.
    pub fn for_session(
        actor_id: Option<Uuid>,
        action: AuditAction,
        session_id: Uuid,
        details: serde_json::Value,
    ) -> Self {
        Self {
            actor_id,
            action,
            target_type: "session".to_string(),
            target_id: Some(session_id),
            details: Some(details),
        }
    }

    /// Materialize the stored row.
    pub fn into_entry(self, id: Uuid, now: DateTime<Utc>) -> AuditLogEntry {
        AuditLogEntry {
            id,
            actor_id: self.actor_id,
            action: self.action.as_str().to_string(),
            target_type: self.target_type,
            target_id: self.target_id,
            details: self.details,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_match_serde() {
        for action in [
            AuditAction::Create,
            AuditAction::ValidateHr,
            AuditAction::RejectHse,
            AuditAction::Complete,
        ] {
            assert_eq!(
                serde_json::to_value(action).unwrap(),
                serde_json::Value::String(action.to_string())
            );
        }
    }
}
