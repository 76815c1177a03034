//! Store traits consumed by the service layer.
//!
//! A store is an opaque record collection: filtered selects ordered by
//! `start_time`, inserts, and a single-row conditional update. Every
//! implementation must apply [`SessionStore::apply_change`] atomically.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use trainhub_core::config::{DatabaseConfig, PersistenceProvider};
use trainhub_core::result::AppResult;
use trainhub_core::types::pagination::{PageRequest, PageResponse};
use trainhub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use trainhub_entity::session::{CreateSession, Session, SessionChange, SessionStatus};

use crate::connection::DatabasePool;
use crate::repositories::{AuditLogRepository, SessionRepository};

use self::memory::{MemoryAuditStore, MemorySessionStore};

/// Training session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Find a session by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// All sessions whose status is in `statuses`, ordered by `start_time` ascending.
    async fn find_by_status(&self, statuses: &[SessionStatus]) -> AppResult<Vec<Session>>;

    /// One page of sessions, ordered by `start_time` ascending.
    ///
    /// An empty `statuses` slice means no status filter.
    async fn list(
        &self,
        statuses: &[SessionStatus],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Session>>;

    /// Insert a new session in `planned` with version 1.
    async fn create(&self, data: &CreateSession) -> AppResult<Session>;

    /// Apply `change` if the row still has `expected_version` and status `change.from`.
    ///
    /// # Errors
    ///
    /// * `NotFound` when no session has this ID.
    /// * `Conflict` when the row was modified since it was read.
    async fn apply_change(
        &self,
        id: Uuid,
        expected_version: i64,
        change: &SessionChange,
    ) -> AppResult<Session>;

    /// Check that the backing store answers.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditStore: Send + Sync + std::fmt::Debug {
    /// Append an entry.
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// Entries for one target, oldest first.
    async fn find_by_target(
        &self,
        target_type: &str,
        target_id: Uuid,
    ) -> AppResult<Vec<AuditLogEntry>>;
}

/// The pair of stores the application runs on.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Session store.
    pub sessions: Arc<dyn SessionStore>,
    /// Audit store.
    pub audit: Arc<dyn AuditStore>,
}

impl Stores {
    /// In-memory stores, empty.
    pub fn memory() -> Self {
        Self {
            sessions: Arc::new(MemorySessionStore::new()),
            audit: Arc::new(MemoryAuditStore::new()),
        }
    }

    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(db: &DatabasePool) -> Self {
        Self {
            sessions: Arc::new(SessionRepository::new(db.pool().clone())),
            audit: Arc::new(AuditLogRepository::new(db.pool().clone())),
        }
    }
}

/// Open the stores selected by `config.provider`.
pub async fn open(config: &DatabaseConfig) -> AppResult<Stores> {
    match config.provider {
        PersistenceProvider::Memory => {
            info!("Using in-memory session store; data is lost on shutdown");
            Ok(Stores::memory())
        }
        PersistenceProvider::Postgres => {
            let db = DatabasePool::connect(config).await?;
            Ok(Stores::postgres(&db))
        }
    }
}
