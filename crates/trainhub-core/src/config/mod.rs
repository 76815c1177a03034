//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, MAX_ACCESS_TTL_MINUTES};
pub use self::database::{DatabaseConfig, PersistenceProvider};
pub use self::logging::LoggingConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "TRAINHUB";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Schedule progression worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `{dir}/default.toml` with an environment-specific overlay
    /// `{dir}/{env}.toml` and environment variables prefixed with
    /// `TRAINHUB__` (e.g. `TRAINHUB__DATABASE__URL`). Missing files are
    /// skipped.
    pub fn load(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single TOML file plus environment overrides.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.provider == PersistenceProvider::Postgres && self.database.url.is_empty()
        {
            return Err(AppError::configuration(
                "database.url is required when database.provider = \"postgres\"",
            ));
        }
        if self.auth.jwt_secret.len() < 16 {
            return Err(AppError::configuration(
                "auth.jwt_secret must be at least 16 characters",
            ));
        }
        if !(1..=MAX_ACCESS_TTL_MINUTES).contains(&self.auth.jwt_access_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.jwt_access_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if self.worker.enabled && self.worker.tick_interval_seconds == 0 {
            return Err(AppError::configuration(
                "worker.tick_interval_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_postgres_and_require_url() {
        let config = AppConfig::default();
        assert_eq!(config.database.provider, PersistenceProvider::Postgres);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_provider_validates_without_url() {
        let mut config = AppConfig::default();
        config.database.provider = PersistenceProvider::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = AppConfig::default();
        config.database.provider = PersistenceProvider::Memory;
        config.auth.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_access_ttl_bounds() {
        let mut config = AppConfig::default();
        config.database.provider = PersistenceProvider::Memory;

        config.auth.jwt_access_ttl_minutes = MAX_ACCESS_TTL_MINUTES;
        assert!(config.validate().is_ok());

        for ttl in [0, MAX_ACCESS_TTL_MINUTES + 1, u64::MAX] {
            config.auth.jwt_access_ttl_minutes = ttl;
            let err = config.validate().unwrap_err();
            assert_eq!(err.kind, crate::error::ErrorKind::Configuration, "ttl {ttl}");
        }
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
            [server]
            port = 9000

            [database]
            provider = "memory"
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("config should deserialize");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.provider, PersistenceProvider::Memory);
        assert_eq!(config.logging.level, "info");
        assert!(config.worker.enabled);
    }
}
