//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use trainhub_core::error::AppError;
use trainhub_entity::session::{Gate, SessionKind, SessionStatus};
use trainhub_service::NewSession;

/// Create session request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Session title.
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    /// `hse` or `metier`.
    pub kind: SessionKind,
    /// Scheduled start.
    pub start_time: DateTime<Utc>,
    /// Scheduled end.
    pub end_time: DateTime<Utc>,
    /// Venue.
    #[validate(length(max = 255))]
    pub location: Option<String>,
    /// Seat count.
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    /// Assigned trainer.
    pub trainer_id: Option<Uuid>,
}

impl From<CreateSessionRequest> for NewSession {
    fn from(req: CreateSessionRequest) -> Self {
        Self {
            title: req.title,
            kind: req.kind,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            capacity: req.capacity,
            trainer_id: req.trainer_id,
        }
    }
}

/// Gate decision request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ValidateSessionRequest {
    /// Gate being decided.
    pub gate: Gate,
    /// `true` to approve, `false` to reject.
    pub approve: bool,
    /// Version the caller last read; stale values are refused.
    pub expected_version: Option<i64>,
    /// Rejection reason.
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Moodle bridge token request: the host's view of the user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmbedTokenRequest {
    /// Host user ID.
    pub user_id: Uuid,
    /// Host username.
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    /// Role name as sent by the host (aliases accepted).
    #[validate(length(min = 1))]
    pub role: String,
}

/// `?status=a,b` filter for session listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusFilter {
    /// Comma-separated status names.
    pub status: Option<String>,
}

impl StatusFilter {
    /// Parsed statuses; empty means no filter.
    pub fn statuses(&self) -> Result<Vec<SessionStatus>, AppError> {
        let Some(raw) = self.status.as_deref() else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<SessionStatus>()
                    .map_err(|_| AppError::validation(format!("Unknown status: {s}")))
            })
            .collect()
    }
}

/// Validation queue query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingQuery {
    /// Only sessions awaiting a gate the caller owns.
    #[serde(default)]
    pub mine: bool,
}
