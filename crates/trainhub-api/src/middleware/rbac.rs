//! RBAC helpers for permission-guarded handlers.

use trainhub_auth::rbac::{RbacEnforcer, SystemPermission};
use trainhub_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the authenticated user's role grants `permission`.
pub fn require_permission(
    auth: &AuthUser,
    rbac: &RbacEnforcer,
    permission: SystemPermission,
) -> Result<(), AppError> {
    rbac.require_permission(&auth.role(), &permission)
}
