//! Session lifecycle state machine.
//!
//! Two kinds of moves exist. Validation gates are exercised by people
//! ([`Transition`]); schedule progression is driven by the clock
//! ([`Progression`]). Both produce a [`SessionChange`] that a store applies
//! with a single versioned write. Nothing here performs I/O.
//!
//! | From           | Gate | Owner     | Approve         | Reject      |
//! |----------------|------|-----------|-----------------|-------------|
//! | `planned` (metier) | hr   | hr, drh | `validated_hr`  | `cancelled` |
//! | `planned` (hse)    | hr   | hr, drh | `awaiting_hse`  | `cancelled` |
//! | `awaiting_hse`     | hse  | hse     | `validated_hse` | `cancelled` |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use trainhub_core::{AppError, AppResult};

use crate::audit::AuditAction;
use crate::user::{Actor, UserRole};

use super::kind::SessionKind;
use super::model::{Cancellation, GateStamp, Session, SessionChange};
use super::status::SessionStatus;

/// A validation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gate {
    /// Human resources approval.
    Hr,
    /// Health, safety and environment approval.
    Hse,
}

impl Gate {
    /// Whether the given role owns this gate.
    pub fn is_owned_by(&self, role: UserRole) -> bool {
        match self {
            Self::Hr => role.is_hr_class(),
            Self::Hse => role.is_hse(),
        }
    }

    /// The status in which a session of `kind` waits for this gate.
    ///
    /// `None` when the gate does not exist for that kind.
    pub fn pending_status(&self, kind: SessionKind) -> Option<SessionStatus> {
        match (self, kind) {
            (Self::Hr, _) => Some(SessionStatus::Planned),
            (Self::Hse, SessionKind::Hse) => Some(SessionStatus::AwaitingHse),
            (Self::Hse, SessionKind::Metier) => None,
        }
    }

    /// The gate a session waits for in `status`, if any.
    pub fn awaited_in(status: SessionStatus) -> Option<Gate> {
        match status {
            SessionStatus::Planned => Some(Self::Hr),
            SessionStatus::AwaitingHse => Some(Self::Hse),
            _ => None,
        }
    }

    /// Return the gate as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::Hse => "hse",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gate {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hr" => Ok(Self::Hr),
            "hse" => Ok(Self::Hse),
            _ => Err(AppError::validation(format!(
                "Invalid gate: '{s}'. Expected one of: hr, hse"
            ))),
        }
    }
}

/// Outcome chosen at a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Pass the gate.
    Approve,
    /// Reject the session.
    Reject,
}

impl From<bool> for Decision {
    fn from(approve: bool) -> Self {
        if approve { Self::Approve } else { Self::Reject }
    }
}

/// Validation gate transitions.
pub struct Transition;

impl Transition {
    /// Plan the change for `actor` deciding `decision` at `gate`.
    ///
    /// The role check runs first so a caller that does not own the gate
    /// learns nothing about the session's position.
    ///
    /// # Errors
    ///
    /// * `Authorization` when the actor's role does not own the gate.
    /// * `InvalidTransition` when the session is not waiting for the gate.
    pub fn plan(
        session: &Session,
        gate: Gate,
        decision: Decision,
        actor: &Actor,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<SessionChange> {
        if !gate.is_owned_by(actor.role) {
            return Err(AppError::authorization(format!(
                "Role '{}' cannot exercise the {gate} gate",
                actor.role
            )));
        }

        if gate.pending_status(session.kind) != Some(session.status) {
            return Err(AppError::invalid_transition(format!(
                "Session {} is '{}'; the {gate} gate is not open",
                session.id, session.status
            )));
        }

        let stamp = GateStamp { at: now, by: actor.id.into_uuid() };
        let change = match (gate, decision) {
            (Gate::Hr, Decision::Approve) => {
                let to = if session.kind.requires_hse_gate() {
                    SessionStatus::AwaitingHse
                } else {
                    SessionStatus::ValidatedHr
                };
                SessionChange {
                    validated_hr: Some(stamp),
                    ..SessionChange::status_only(session.status, to, AuditAction::ValidateHr, now)
                }
            }
            (Gate::Hse, Decision::Approve) => SessionChange {
                validated_hse: Some(stamp),
                ..SessionChange::status_only(
                    session.status,
                    SessionStatus::ValidatedHse,
                    AuditAction::ValidateHse,
                    now,
                )
            },
            (gate, Decision::Reject) => {
                let action = match gate {
                    Gate::Hr => AuditAction::RejectHr,
                    Gate::Hse => AuditAction::RejectHse,
                };
                SessionChange {
                    cancellation: Some(Cancellation {
                        at: now,
                        by: Some(stamp.by),
                        reason: reason.filter(|r| !r.trim().is_empty()),
                    }),
                    ..SessionChange::status_only(
                        session.status,
                        SessionStatus::Cancelled,
                        action,
                        now,
                    )
                }
            }
        };

        Ok(change)
    }
}

/// The gates `actor` could exercise on `session` right now.
///
/// Empty or a single element.
pub fn legal_gates(session: &Session, actor: &Actor) -> Vec<Gate> {
    Gate::awaited_in(session.status)
        .filter(|gate| gate.pending_status(session.kind) == Some(session.status))
        .filter(|gate| gate.is_owned_by(actor.role))
        .into_iter()
        .collect()
}

/// Clock-driven moves for fully validated sessions.
pub struct Progression;

impl Progression {
    /// Statuses the progression scans.
    pub const SCANNED: [SessionStatus; 3] = [
        SessionStatus::ValidatedHr,
        SessionStatus::ValidatedHse,
        SessionStatus::Ongoing,
    ];

    /// The change due for `session` at `now`, if any.
    ///
    /// Sessions waiting for a gate or already terminal are never due.
    pub fn due(session: &Session, now: DateTime<Utc>) -> Option<SessionChange> {
        match session.status {
            SessionStatus::ValidatedHr | SessionStatus::ValidatedHse
                if session.start_time <= now =>
            {
                Some(SessionChange::status_only(
                    session.status,
                    SessionStatus::Ongoing,
                    AuditAction::Start,
                    now,
                ))
            }
            SessionStatus::Ongoing if session.end_time <= now => {
                Some(SessionChange::status_only(
                    session.status,
                    SessionStatus::Completed,
                    AuditAction::Complete,
                    now,
                ))
            }
            _ => None,
        }
    }
}
