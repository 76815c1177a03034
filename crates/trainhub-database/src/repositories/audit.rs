//! Audit log repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use trainhub_core::error::{AppError, ErrorKind};
use trainhub_core::result::AppResult;
use trainhub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};

use crate::store::AuditStore;

/// PostgreSQL repository for `audit_log`.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_log (id, actor_id, action, target_type, target_id, details) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(entry.actor_id)
        .bind(entry.action.as_str())
        .bind(&entry.target_type)
        .bind(entry.target_id)
        .bind(&entry.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit entry", e))
    }

    async fn find_by_target(
        &self,
        target_type: &str,
        target_id: Uuid,
    ) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_log WHERE target_type = $1 AND target_id = $2 \
             ORDER BY created_at ASC",
        )
        .bind(target_type)
        .bind(target_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find audit entries", e))
    }
}
