//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles known to TrainHub.
///
/// Roles are flat: there is no privilege ordering between them. The two
/// validation gates are owned by role classes, see [`UserRole::is_hr_class`]
/// and [`UserRole::is_hse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator (configuration, audit).
    Admin,
    /// Human resources director.
    Drh,
    /// Human resources officer.
    Hr,
    /// Health, safety and environment officer.
    Hse,
    /// Line manager.
    Manager,
    /// Trainer delivering sessions.
    Trainer,
    /// Employee attending sessions.
    Employee,
}

impl UserRole {
    /// All roles, in declaration order.
    pub const ALL: [UserRole; 7] = [
        Self::Admin,
        Self::Drh,
        Self::Hr,
        Self::Hse,
        Self::Manager,
        Self::Trainer,
        Self::Employee,
    ];

    /// HR-class roles own the first validation gate and session creation.
    pub fn is_hr_class(&self) -> bool {
        matches!(self, Self::Hr | Self::Drh)
    }

    /// The HSE role owns the second validation gate.
    pub fn is_hse(&self) -> bool {
        matches!(self, Self::Hse)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Drh => "drh",
            Self::Hr => "hr",
            Self::Hse => "hse",
            Self::Manager => "manager",
            Self::Trainer => "trainer",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = trainhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "drh" => Ok(Self::Drh),
            "hr" | "rh" => Ok(Self::Hr),
            "hse" => Ok(Self::Hse),
            "manager" => Ok(Self::Manager),
            "trainer" | "formateur" => Ok(Self::Trainer),
            "employee" | "employe" => Ok(Self::Employee),
            _ => Err(trainhub_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, drh, hr, hse, manager, trainer, employee"
            ))),
        }
    }
}
