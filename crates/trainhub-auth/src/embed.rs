//! Shared-secret check for the Moodle embedding bridge.

use subtle::ConstantTimeEq;
use tracing::warn;

use trainhub_core::config::AuthConfig;
use trainhub_core::error::AppError;

/// Verifies the `X-Embed-Key` presented by the host platform.
#[derive(Clone)]
pub struct EmbedVerifier {
    secret: Vec<u8>,
}

impl std::fmt::Debug for EmbedVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedVerifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl EmbedVerifier {
    /// Creates a verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.embed_shared_secret.as_bytes().to_vec(),
        }
    }

    /// Whether a shared secret is configured.
    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Check a presented key in constant time.
    ///
    /// # Errors
    ///
    /// * `Authorization` when the bridge is disabled.
    /// * `Authentication` when the key is missing or wrong.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AppError> {
        if !self.is_enabled() {
            return Err(AppError::authorization("Embed bridge is disabled"));
        }

        let presented = presented.ok_or_else(|| AppError::authentication("Missing embed key"))?;
        if bool::from(presented.as_bytes().ct_eq(&self.secret)) {
            Ok(())
        } else {
            warn!("Rejected embed token request with an invalid key");
            Err(AppError::authentication("Invalid embed key"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trainhub_core::error::ErrorKind;

    fn verifier(secret: &str) -> EmbedVerifier {
        EmbedVerifier::new(&AuthConfig {
            embed_shared_secret: secret.into(),
            ..AuthConfig::default()
        })
    }

    #[test]
    fn test_disabled_without_secret() {
        let err = verifier("").verify(Some("")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_key_comparison() {
        let v = verifier("moodle-shared");
        assert!(v.verify(Some("moodle-shared")).is_ok());
        assert_eq!(
            v.verify(Some("moodle-share")).unwrap_err().kind,
            ErrorKind::Authentication
        );
        assert_eq!(v.verify(None).unwrap_err().kind, ErrorKind::Authentication);
    }
}
