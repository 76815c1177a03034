//! # trainhub-auth
//!
//! Authentication and authorization for TrainHub.
//!
//! ## Modules
//!
//! - `jwt`: access token issuance and verification (HS256)
//! - `rbac`: role to system permission mapping and enforcement
//! - `embed`: shared-secret verification for the Moodle embedding bridge

pub mod embed;
pub mod jwt;
pub mod rbac;

pub use embed::EmbedVerifier;
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use rbac::{RbacEnforcer, RbacPolicies, SystemPermission};
