//! JWT claims structure used in access tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trainhub_core::types::UserId;
use trainhub_entity::user::{Actor, UserRole};

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID on the host platform.
    pub sub: Uuid,
    /// Username for logs and display.
    pub username: String,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// Issuer.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token ID.
    pub jti: Uuid,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }

    /// The actor these claims authenticate.
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id(), self.username.clone(), self.role)
    }
}
