//! Training session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::audit::AuditAction;

use super::kind::SessionKind;
use super::status::SessionStatus;

/// A scheduled training session subject to validation.
///
/// `status` is the single source of truth for the workflow position. The
/// gate stamps record who passed each gate and when; they are written once
/// and never cleared.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// Descriptive title.
    pub title: String,
    /// Session kind; decides whether the HSE gate exists.
    pub kind: SessionKind,
    /// Current workflow position.
    pub status: SessionStatus,
    /// Scheduled start.
    pub start_time: DateTime<Utc>,
    /// Scheduled end, strictly after `start_time`.
    pub end_time: DateTime<Utc>,
    /// Where the session takes place.
    pub location: Option<String>,
    /// Maximum number of attendees.
    pub capacity: Option<i32>,
    /// Assigned trainer.
    pub trainer_id: Option<Uuid>,
    /// HR-class user who created the session.
    pub created_by: Uuid,

    // -- Gate stamps --
    /// When the HR gate passed.
    pub validated_hr_at: Option<DateTime<Utc>>,
    /// Who passed the HR gate.
    pub validated_hr_by: Option<Uuid>,
    /// When the HSE gate passed.
    pub validated_hse_at: Option<DateTime<Utc>>,
    /// Who passed the HSE gate.
    pub validated_hse_by: Option<Uuid>,

    // -- Cancellation --
    /// When the session was rejected.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Who rejected the session.
    pub cancelled_by: Option<Uuid>,
    /// Free-text reason given on rejection.
    pub cancellation_reason: Option<String>,

    /// Optimistic concurrency token, incremented by every write.
    pub version: i64,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session has passed every gate its kind requires.
    pub fn is_fully_validated(&self) -> bool {
        self.status.is_fully_validated()
    }

    /// Check whether the session waits for a validation gate.
    pub fn is_pending_validation(&self) -> bool {
        self.status.is_pending_validation()
    }

    /// Scheduled duration in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Apply a planned change in place and bump the version.
    ///
    /// Used by in-memory stores; the Postgres store performs the same
    /// update in SQL.
    pub fn apply(&mut self, change: &SessionChange) {
        self.status = change.to;
        if let Some(stamp) = change.validated_hr {
            self.validated_hr_at = Some(stamp.at);
            self.validated_hr_by = Some(stamp.by);
        }
        if let Some(stamp) = change.validated_hse {
            self.validated_hse_at = Some(stamp.at);
            self.validated_hse_by = Some(stamp.by);
        }
        if let Some(cancellation) = &change.cancellation {
            self.cancelled_at = Some(cancellation.at);
            self.cancelled_by = cancellation.by;
            self.cancellation_reason = cancellation.reason.clone();
        }
        self.version += 1;
        self.updated_at = change.at;
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
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
    /// Creating user.
    pub created_by: Uuid,
}

impl CreateSession {
    /// Build the row a store persists for this request: `planned`, version 1.
    pub fn into_session(self, id: Uuid, now: DateTime<Utc>) -> Session {
        Session {
            id,
            title: self.title,
            kind: self.kind,
            status: SessionStatus::Planned,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            capacity: self.capacity,
            trainer_id: self.trainer_id,
            created_by: self.created_by,
            validated_hr_at: None,
            validated_hr_by: None,
            validated_hse_at: None,
            validated_hse_by: None,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Who passed a gate and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateStamp {
    /// When the gate passed.
    pub at: DateTime<Utc>,
    /// The validating user.
    pub by: Uuid,
}

/// Rejection details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    /// When the session was rejected.
    pub at: DateTime<Utc>,
    /// The rejecting user.
    pub by: Option<Uuid>,
    /// Optional free-text reason.
    pub reason: Option<String>,
}

/// A single planned write to a session row.
///
/// Produced by the transition functions and applied by a store with one
/// conditional update. Stamps that are `None` leave the stored columns
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionChange {
    /// Status the session is expected to be in.
    pub from: SessionStatus,
    /// Status after the write.
    pub to: SessionStatus,
    /// Audit action recorded for this change.
    pub action: AuditAction,
    /// HR gate stamp to set.
    pub validated_hr: Option<GateStamp>,
    /// HSE gate stamp to set.
    pub validated_hse: Option<GateStamp>,
    /// Cancellation to record.
    pub cancellation: Option<Cancellation>,
    /// Time of the change, stored as `updated_at`.
    pub at: DateTime<Utc>,
}

impl SessionChange {
    /// A bare status move with no stamps.
    pub fn status_only(
        from: SessionStatus,
        to: SessionStatus,
        action: AuditAction,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            from,
            to,
            action,
            validated_hr: None,
            validated_hse: None,
            cancellation: None,
            at,
        }
    }

    /// Structured details for the audit trail.
    pub fn audit_details(&self) -> serde_json::Value {
        let mut details = serde_json::json!({
            "from": self.from,
            "to": self.to,
        });
        if let Some(reason) = self.cancellation.as_ref().and_then(|c| c.reason.as_ref()) {
            details["reason"] = serde_json::Value::String(reason.clone());
        }
        details
    }
}
