//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use trainhub_core::config::AuthConfig;
use trainhub_core::error::AppError;

use super::claims::Claims;

/// Validates access tokens: signature, expiry and issuer.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock skew
        validation.set_issuer(&[config.jwt_issuer.as_str()]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::authentication("Invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AppError::authentication("Invalid token issuer")
                }
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            })
    }
}
