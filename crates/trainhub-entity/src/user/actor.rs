//! The acting user of an operation.

use serde::{Deserialize, Serialize};

use trainhub_core::types::UserId;

use super::role::UserRole;

/// Authenticated user performing an action, identified by id and role.
///
/// Passed explicitly into every workflow operation; nothing in TrainHub
/// reads the current user from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User identifier on the host platform.
    pub id: UserId,
    /// Login or display name, for logs and audit details.
    pub username: String,
    /// Role at the time the credential was issued.
    pub role: UserRole,
}

impl Actor {
    /// Creates a new actor.
    pub fn new(id: UserId, username: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }

    /// Whether the actor holds exactly the given role.
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }

    /// Whether the actor holds an HR-class role (`hr` or `drh`).
    pub fn is_hr_class(&self) -> bool {
        self.role.is_hr_class()
    }
}
