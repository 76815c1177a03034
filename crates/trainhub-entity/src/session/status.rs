//! Training session status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow position of a training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created, waiting for the HR gate.
    Planned,
    /// HSE session that passed the HR gate, waiting for the HSE gate.
    AwaitingHse,
    /// Métier session that passed the HR gate. Fully validated.
    ValidatedHr,
    /// HSE session that passed both gates. Fully validated.
    ValidatedHse,
    /// The session has started.
    Ongoing,
    /// The session has ended.
    Completed,
    /// Rejected at a gate.
    Cancelled,
}

impl SessionStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [SessionStatus; 7] = [
        Self::Planned,
        Self::AwaitingHse,
        Self::ValidatedHr,
        Self::ValidatedHse,
        Self::Ongoing,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Statuses in which a session waits for a validation gate.
    pub const PENDING: [SessionStatus; 2] = [Self::Planned, Self::AwaitingHse];

    /// Check if the session is in an absorbing state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Check if the session waits for a validation gate.
    pub fn is_pending_validation(&self) -> bool {
        Self::PENDING.contains(self)
    }

    /// Check if every required gate has been passed.
    pub fn is_fully_validated(&self) -> bool {
        matches!(self, Self::ValidatedHr | Self::ValidatedHse)
    }

    /// Check if the HR gate has been passed in this status.
    pub fn has_passed_hr_gate(&self) -> bool {
        matches!(
            self,
            Self::AwaitingHse | Self::ValidatedHr | Self::ValidatedHse | Self::Ongoing | Self::Completed
        )
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::AwaitingHse => "awaiting_hse",
            Self::ValidatedHr => "validated_hr",
            Self::ValidatedHse => "validated_hse",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = trainhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                trainhub_core::AppError::validation(format!("Invalid session status: '{s}'"))
            })
    }
}
