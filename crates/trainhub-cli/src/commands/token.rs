//! Access token issuance for operators and integration testing.

use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use trainhub_auth::jwt::JwtEncoder;
use trainhub_core::config::AppConfig;
use trainhub_core::error::AppError;
use trainhub_core::types::UserId;
use trainhub_entity::user::{Actor, UserRole};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue a bearer token for a user
    Issue {
        /// User ID
        #[arg(long)]
        user_id: Uuid,
        /// Username
        #[arg(long)]
        username: String,
        /// Role (admin, drh, hr, hse, manager, trainer, employee)
        #[arg(long)]
        role: UserRole,
    },
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Issue {
            user_id,
            username,
            role,
        } => {
            let actor = Actor::new(UserId::from_uuid(*user_id), username.clone(), *role);
            let token = JwtEncoder::new(&config.auth).issue_access_token(&actor)?;

            match format {
                OutputFormat::Json => output::print_json(&token),
                OutputFormat::Table => {
                    output::print_kv("Token", &token.access_token);
                    output::print_kv("Expires at", &token.expires_at.to_rfc3339());
                }
            }
        }
    }
    Ok(())
}
