//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trainhub_core::config::{AuthConfig, MAX_ACCESS_TTL_MINUTES};
use trainhub_core::error::AppError;
use trainhub_entity::user::Actor;

use super::claims::Claims;

/// Creates signed JWT access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: String,
    access_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

/// A freshly issued access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The signed token.
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// The TTL is clamped to `1..=MAX_ACCESS_TTL_MINUTES`.
    pub fn new(config: &AuthConfig) -> Self {
        let ttl = config.jwt_access_ttl_minutes.clamp(1, MAX_ACCESS_TTL_MINUTES);
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            access_ttl_minutes: ttl as i64,
        }
    }

    /// Issue an access token for `actor`.
    pub fn issue_access_token(&self, actor: &Actor) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.access_ttl_minutes);

        let claims = Claims {
            sub: actor.id.into_uuid(),
            username: actor.username.clone(),
            role: actor.role,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl_minutes as u64 * 60,
            expires_at: exp,
        })
    }
}
