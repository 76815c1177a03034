//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Longest accepted access token lifetime (one week).
pub const MAX_ACCESS_TTL_MINUTES: u64 = 7 * 24 * 60;

/// Token signing and embedding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes, `1..=MAX_ACCESS_TTL_MINUTES`.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Expected `iss` claim; also stamped on issued tokens.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Shared secret the Moodle host presents in `X-Embed-Key`.
    ///
    /// An empty value disables the embed token endpoint.
    #[serde(default)]
    pub embed_shared_secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_access_ttl_minutes: default_access_ttl(),
            jwt_issuer: default_issuer(),
            embed_shared_secret: String::new(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_issuer() -> String {
    "trainhub".to_string()
}
