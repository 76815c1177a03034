//! Training session CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat, or_dash};
use trainhub_auth::rbac::RbacEnforcer;
use trainhub_core::config::AppConfig;
use trainhub_core::error::AppError;
use trainhub_core::types::UserId;
use trainhub_core::types::pagination::PageRequest;
use trainhub_database::store;
use trainhub_entity::session::{Decision, Gate, Session, SessionStatus};
use trainhub_entity::user::{Actor, UserRole};
use trainhub_service::{AuditService, ValidationEngine, ValidationQueue, ValidationRequest};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List sessions, optionally filtered by status
    List {
        /// Status filter (repeatable)
        #[arg(long, value_delimiter = ',')]
        status: Vec<SessionStatus>,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Page size
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Show one session with its audit trail
    Show {
        /// Session ID
        id: Uuid,
    },
    /// List sessions awaiting a gate decision
    Pending,
    /// Approve or reject a gate on behalf of an actor
    Validate {
        /// Session ID
        id: Uuid,
        /// Gate to decide (hr or hse)
        #[arg(long)]
        gate: Gate,
        /// Approve the gate
        #[arg(long, conflicts_with = "reject", required_unless_present = "reject")]
        approve: bool,
        /// Reject the gate, cancelling the session
        #[arg(long)]
        reject: bool,
        /// Acting user ID
        #[arg(long)]
        actor: Uuid,
        /// Acting user's role
        #[arg(long)]
        role: UserRole,
        /// Rejection reason
        #[arg(long)]
        reason: Option<String>,
        /// Skip the rejection confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Session ID
    id: String,
    /// Title
    title: String,
    /// Kind
    kind: String,
    /// Status
    status: String,
    /// Start
    start: String,
    /// Version
    version: i64,
}

impl From<&Session> for SessionRow {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id.to_string(),
            title: s.title.clone(),
            kind: s.kind.as_str().to_string(),
            status: s.status.as_str().to_string(),
            start: s.start_time.format("%Y-%m-%d %H:%M").to_string(),
            version: s.version,
        }
    }
}

fn print_sessions(sessions: &[Session], format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(&sessions),
        OutputFormat::Table => {
            let rows: Vec<SessionRow> = sessions.iter().map(SessionRow::from).collect();
            output::print_list(&rows, format);
        }
    }
}

fn print_session(session: &Session) {
    output::print_kv("ID", &session.id.to_string());
    output::print_kv("Title", &session.title);
    output::print_kv("Kind", session.kind.as_str());
    output::print_kv("Status", session.status.as_str());
    output::print_kv("Start", &session.start_time.to_rfc3339());
    output::print_kv("End", &session.end_time.to_rfc3339());
    output::print_kv("Location", &or_dash(session.location.as_deref()));
    output::print_kv("Capacity", &or_dash(session.capacity));
    output::print_kv("HR validated at", &or_dash(session.validated_hr_at));
    output::print_kv("HSE validated at", &or_dash(session.validated_hse_at));
    output::print_kv("Cancelled at", &or_dash(session.cancelled_at));
    output::print_kv("Reason", &or_dash(session.cancellation_reason.as_deref()));
    output::print_kv("Version", &session.version.to_string());
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    super::require_persistent_store(config)?;
    let stores = store::open(&config.database).await?;

    match &args.command {
        SessionCommand::List {
            status,
            page,
            per_page,
        } => {
            let page = stores
                .sessions
                .list(status, &PageRequest::new(*page, *per_page))
                .await?;
            print_sessions(&page.items, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {}/{} ({} sessions)",
                    page.page, page.total_pages, page.total_items
                );
            }
        }
        SessionCommand::Show { id } => {
            let session = stores
                .sessions
                .find_by_id(*id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Session {id} not found")))?;
            let trail = stores.audit.find_by_target("session", *id).await?;

            match format {
                OutputFormat::Json => output::print_json(&serde_json::json!({
                    "session": session,
                    "audit": trail,
                })),
                OutputFormat::Table => {
                    print_session(&session);
                    println!();
                    for entry in &trail {
                        println!(
                            "  {}  {:<22} {}",
                            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
                            entry.action,
                            or_dash(entry.actor_id)
                        );
                    }
                }
            }
        }
        SessionCommand::Pending => {
            let queue = ValidationQueue::new(stores.sessions.clone())
                .list_pending()
                .await?;
            let sessions: Vec<Session> = queue.into_iter().collect();
            print_sessions(&sessions, format);
        }
        SessionCommand::Validate {
            id,
            gate,
            approve,
            reject,
            actor,
            role,
            reason,
            yes,
        } => {
            let decision = Decision::from(*approve && !*reject);

            if decision == Decision::Reject && !*yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Reject the {gate} gate of session {id}? The session will be cancelled."
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let audit = AuditService::new(stores.audit.clone(), Arc::new(RbacEnforcer::new()));
            let engine = ValidationEngine::new(stores.sessions.clone(), audit);
            let actor = Actor::new(UserId::from_uuid(*actor), "cli", *role);

            let session = engine
                .validate(
                    &actor,
                    ValidationRequest {
                        session_id: *id,
                        gate: *gate,
                        decision,
                        expected_version: None,
                        reason: reason.clone(),
                    },
                )
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&session),
                OutputFormat::Table => output::print_success(&format!(
                    "Session {} is now {}",
                    session.id,
                    session.status.as_str()
                )),
            }
        }
    }

    Ok(())
}
