//! CLI command definitions and dispatch.

pub mod migrate;
pub mod session;
pub mod token;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use trainhub_core::config::{AppConfig, PersistenceProvider};
use trainhub_core::error::AppError;

/// TrainHub: training session validation workflow
#[derive(Debug, Parser)]
#[command(name = "trainhub-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Inspect and decide training sessions
    Session(session::SessionArgs),
    /// Issue access tokens
    Token(token::TokenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_file(&self.config)?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Session(args) => session::execute(args, &config, self.format).await,
            Commands::Token(args) => token::execute(args, &config, self.format),
        }
    }
}

/// Fails unless the configured store is Postgres; the memory store does
/// not outlive the process.
pub fn require_persistent_store(config: &AppConfig) -> Result<(), AppError> {
    if config.database.provider != PersistenceProvider::Postgres {
        return Err(AppError::configuration(
            "This command needs database.provider = \"postgres\"; the memory store is per-process",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_requires_a_decision() {
        let parsed = Cli::try_parse_from([
            "trainhub-cli",
            "session",
            "validate",
            "6f1c1f5e-7a0e-4a35-9d7e-0b3a1c1e2f10",
            "--gate",
            "hr",
            "--actor",
            "6f1c1f5e-7a0e-4a35-9d7e-0b3a1c1e2f11",
            "--role",
            "hr",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_memory_provider_is_refused() {
        let mut config = AppConfig::default();
        config.database.provider = PersistenceProvider::Memory;
        assert!(require_persistent_store(&config).is_err());
        config.database.provider = PersistenceProvider::Postgres;
        assert!(require_persistent_store(&config).is_ok());
    }

    #[test]
    fn test_format_flag_parses() {
        let cli = Cli::try_parse_from(["trainhub-cli", "--format", "json", "session", "pending"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
