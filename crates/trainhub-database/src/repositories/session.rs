//! Training session repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use trainhub_core::error::{AppError, ErrorKind};
use trainhub_core::result::AppResult;
use trainhub_core::types::pagination::{PageRequest, PageResponse};
use trainhub_entity::session::{CreateSession, Session, SessionChange, SessionStatus};

use crate::store::SessionStore;

/// PostgreSQL repository for `training_sessions`.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Statuses bind as `session_status[]`; the column is never cast.
const FIND_BY_STATUS: &str = "SELECT * FROM training_sessions WHERE status = ANY($1) \
     ORDER BY start_time ASC, id ASC";

const COUNT_ALL: &str = "SELECT COUNT(*) FROM training_sessions";

const COUNT_BY_STATUS: &str = "SELECT COUNT(*) FROM training_sessions WHERE status = ANY($1)";

const PAGE_ALL: &str = "SELECT * FROM training_sessions \
     ORDER BY start_time ASC, id ASC LIMIT $1 OFFSET $2";

const PAGE_BY_STATUS: &str = "SELECT * FROM training_sessions WHERE status = ANY($1) \
     ORDER BY start_time ASC, id ASC LIMIT $2 OFFSET $3";

#[async_trait]
impl SessionStore for SessionRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM training_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    async fn find_by_status(&self, statuses: &[SessionStatus]) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(FIND_BY_STATUS)
            .bind(statuses)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find sessions by status", e)
            })
    }

    async fn list(
        &self,
        statuses: &[SessionStatus],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Session>> {
        let limit = page.limit() as i64;
        let offset = page.offset() as i64;

        let (total, sessions) = if statuses.is_empty() {
            let total: i64 = sqlx::query_scalar(COUNT_ALL).fetch_one(&self.pool).await.map_err(
                |e| AppError::with_source(ErrorKind::Database, "Failed to count sessions", e),
            )?;
            let sessions = sqlx::query_as::<_, Session>(PAGE_ALL)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list sessions", e)
                })?;
            (total, sessions)
        } else {
            let total: i64 = sqlx::query_scalar(COUNT_BY_STATUS)
                .bind(statuses)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count sessions", e)
                })?;
            let sessions = sqlx::query_as::<_, Session>(PAGE_BY_STATUS)
                .bind(statuses)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list sessions", e)
                })?;
            (total, sessions)
        };

        Ok(PageResponse::new(
            sessions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        let now = Utc::now();
        sqlx::query_as::<_, Session>(
            "INSERT INTO training_sessions \
             (id, title, kind, status, start_time, end_time, location, capacity, trainer_id, \
              created_by, version, created_at, updated_at) \
             VALUES ($1, $2, $3, 'planned', $4, $5, $6, $7, $8, $9, 1, $10, $10) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.title)
        .bind(data.kind)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(&data.location)
        .bind(data.capacity)
        .bind(data.trainer_id)
        .bind(data.created_by)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    async fn apply_change(
        &self,
        id: Uuid,
        expected_version: i64,
        change: &SessionChange,
    ) -> AppResult<Session> {
        let hr = change.validated_hr;
        let hse = change.validated_hse;
        let cancellation = change.cancellation.as_ref();

        let updated = sqlx::query_as::<_, Session>(
            "UPDATE training_sessions SET \
                status = $4, \
                validated_hr_at = COALESCE($5, validated_hr_at), \
                validated_hr_by = COALESCE($6, validated_hr_by), \
                validated_hse_at = COALESCE($7, validated_hse_at), \
                validated_hse_by = COALESCE($8, validated_hse_by), \
                cancelled_at = COALESCE($9, cancelled_at), \
                cancelled_by = COALESCE($10, cancelled_by), \
                cancellation_reason = COALESCE($11, cancellation_reason), \
                version = version + 1, \
                updated_at = $12 \
             WHERE id = $1 AND version = $2 AND status = $3 \
             RETURNING *",
        )
        .bind(id)
        .bind(expected_version)
        .bind(change.from)
        .bind(change.to)
        .bind(hr.map(|s| s.at))
        .bind(hr.map(|s| s.by))
        .bind(hse.map(|s| s.at))
        .bind(hse.map(|s| s.by))
        .bind(cancellation.map(|c| c.at))
        .bind(cancellation.and_then(|c| c.by))
        .bind(cancellation.and_then(|c| c.reason.clone()))
        .bind(change.at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update session", e))?;

        match updated {
            Some(session) => Ok(session),
            None => match self.find_by_id(id).await? {
                Some(current) => Err(AppError::conflict(format!(
                    "Session {id} was modified concurrently (expected version {expected_version}, found {})",
                    current.version
                ))),
                None => Err(AppError::not_found(format!("Session {id} not found"))),
            },
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
