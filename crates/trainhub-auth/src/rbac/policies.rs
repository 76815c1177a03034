//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use trainhub_entity::user::UserRole;

/// A system-level permission checked at the API boundary.
///
/// Gate ownership is not a permission: the validation engine checks it
/// against the role directly. `SessionValidateHr` and `SessionValidateHse`
/// are listed so clients can tell which gates a role may exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    /// Create training sessions.
    SessionCreate,
    /// Read training sessions.
    SessionRead,
    /// Exercise the HR gate.
    SessionValidateHr,
    /// Exercise the HSE gate.
    SessionValidateHse,
    /// View the validation queue.
    ValidationQueueView,
    /// Read the audit trail.
    AuditView,
}

/// Defines the mapping from each role to its set of allowed system permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<SystemPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        use SystemPermission::*;

        let everyone = [SessionRead];

        let hr_class: HashSet<_> = everyone
            .into_iter()
            .chain([SessionCreate, SessionValidateHr, ValidationQueueView, AuditView])
            .collect();
        let hse: HashSet<_> = everyone
            .into_iter()
            .chain([SessionValidateHse, ValidationQueueView, AuditView])
            .collect();
        let admin: HashSet<_> = everyone
            .into_iter()
            .chain([ValidationQueueView, AuditView])
            .collect();
        let manager: HashSet<_> = everyone.into_iter().chain([ValidationQueueView]).collect();
        let base: HashSet<_> = everyone.into_iter().collect();

        let mut policies = HashMap::new();
        policies.insert(UserRole::Hr, hr_class.clone());
        policies.insert(UserRole::Drh, hr_class);
        policies.insert(UserRole::Hse, hse);
        policies.insert(UserRole::Admin, admin);
        policies.insert(UserRole::Manager, manager);
        policies.insert(UserRole::Trainer, base.clone());
        policies.insert(UserRole::Employee, base);

        Self { policies }
    }

    /// Returns the permissions for the given role, sorted.
    pub fn permissions_for_role(&self, role: &UserRole) -> Vec<SystemPermission> {
        let mut perms: Vec<_> = self
            .policies
            .get(role)
            .map(|p| p.iter().copied().collect())
            .unwrap_or_default();
        perms.sort();
        perms
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: &UserRole, permission: &SystemPermission) -> bool {
        self.policies
            .get(role)
            .map(|perms| perms.contains(permission))
            .unwrap_or(false)
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
