//! RBAC enforcement: checks whether a role has a required system permission.

use trainhub_core::error::AppError;
use trainhub_entity::user::UserRole;

use super::policies::{RbacPolicies, SystemPermission};

/// Enforces role-based access control for system-level operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Ok(())` if allowed, or an `Authorization` error if denied.
    pub fn require_permission(
        &self,
        role: &UserRole,
        permission: &SystemPermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' does not have permission '{permission:?}'"
            )))
        }
    }

    /// Checks whether the role has the required permission (returns bool).
    pub fn has_permission(&self, role: &UserRole, permission: &SystemPermission) -> bool {
        self.policies.has_permission(role, permission)
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}
