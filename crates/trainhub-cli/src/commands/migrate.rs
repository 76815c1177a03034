//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use trainhub_core::config::AppConfig;
use trainhub_core::error::AppError;
use trainhub_database::connection::{DatabasePool, mask_password};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    super::require_persistent_store(config)?;

    match &args.command {
        MigrateCommand::Run => {
            println!(
                "Running database migrations against {}...",
                mask_password(&config.database.url)
            );
            let mut db_config = config.database.clone();
            db_config.run_migrations = false;
            let db = DatabasePool::connect(&db_config).await?;
            trainhub_database::migration::run_migrations(db.pool()).await?;
            db.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
