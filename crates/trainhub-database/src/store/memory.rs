//! In-memory stores for single-node runs and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use trainhub_core::error::AppError;
use trainhub_core::result::AppResult;
use trainhub_core::types::pagination::{PageRequest, PageResponse};
use trainhub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use trainhub_entity::session::{CreateSession, Session, SessionChange, SessionStatus};

use super::{AuditStore, SessionStore};

/// Session store backed by a `HashMap` behind a Tokio `RwLock`.
///
/// The version check and the update happen under one write guard, which
/// gives the same single-row atomicity as the SQL conditional update.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row as-is, replacing any row with the same ID.
    pub async fn insert(&self, session: Session) {
        self.sessions.write().await.insert(session.id, session);
    }

    async fn sorted(&self, statuses: &[SessionStatus]) -> Vec<Session> {
        let guard = self.sessions.read().await;
        let mut rows: Vec<Session> = guard
            .values()
            .filter(|s| statuses.is_empty() || statuses.contains(&s.status))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        rows
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn find_by_status(&self, statuses: &[SessionStatus]) -> AppResult<Vec<Session>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.sorted(statuses).await)
    }

    async fn list(
        &self,
        statuses: &[SessionStatus],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Session>> {
        let rows = self.sorted(statuses).await;
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        let session = data.clone().into_session(Uuid::now_v7(), Utc::now());
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn apply_change(
        &self,
        id: Uuid,
        expected_version: i64,
        change: &SessionChange,
    ) -> AppResult<Session> {
        let mut guard = self.sessions.write().await;
        let session = guard
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Session {id} not found")))?;

        if session.version != expected_version || session.status != change.from {
            return Err(AppError::conflict(format!(
                "Session {id} was modified concurrently (expected version {expected_version}, found {})",
                session.version
            )));
        }

        session.apply(change);
        Ok(session.clone())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Audit store backed by a `Vec` behind a Tokio `RwLock`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditStore {
    entries: Arc<RwLock<Vec<AuditLogEntry>>>,
}

impl MemoryAuditStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        let row = entry.clone().into_entry(Uuid::now_v7(), Utc::now());
        self.entries.write().await.push(row.clone());
        Ok(row)
    }

    async fn find_by_target(
        &self,
        target_type: &str,
        target_id: Uuid,
    ) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.target_type == target_type && e.target_id == Some(target_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use trainhub_core::error::ErrorKind;
    use trainhub_entity::audit::AuditAction;
    use trainhub_entity::session::SessionKind;

    fn new_session(title: &str, kind: SessionKind, starts_in_days: i64) -> CreateSession {
        let start = Utc::now() + Duration::days(starts_in_days);
        CreateSession {
            title: title.to_string(),
            kind,
            start_time: start,
            end_time: start + Duration::hours(3),
            location: None,
            capacity: None,
            trainer_id: None,
            created_by: Uuid::new_v4(),
        }
    }

    fn cancel(from: SessionStatus) -> SessionChange {
        SessionChange::status_only(from, SessionStatus::Cancelled, AuditAction::RejectHr, Utc::now())
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemorySessionStore::new();
        let created = store
            .create(&new_session("SST", SessionKind::Hse, 2))
            .await
            .unwrap();

        let found = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.status, SessionStatus::Planned);
        assert_eq!(found.version, 1);
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_status_orders_by_start_time() {
        let store = MemorySessionStore::new();
        store.create(&new_session("late", SessionKind::Metier, 9)).await.unwrap();
        store.create(&new_session("early", SessionKind::Metier, 1)).await.unwrap();
        let cancelled = store.create(&new_session("gone", SessionKind::Hse, 0)).await.unwrap();
        store
            .apply_change(cancelled.id, 1, &cancel(SessionStatus::Planned))
            .await
            .unwrap();

        let pending = store.find_by_status(&[SessionStatus::Planned]).await.unwrap();
        let titles: Vec<_> = pending.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late"]);

        let page = store.list(&[], &PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "gone");
    }

    #[tokio::test]
    async fn test_stale_version_conflicts() {
        let store = MemorySessionStore::new();
        let s = store.create(&new_session("SST", SessionKind::Hse, 2)).await.unwrap();

        let updated = store
            .apply_change(s.id, 1, &cancel(SessionStatus::Planned))
            .await
            .unwrap();
        assert_eq!(updated.version, 2);

        let err = store
            .apply_change(s.id, 1, &cancel(SessionStatus::Planned))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = store
            .apply_change(Uuid::new_v4(), 1, &cancel(SessionStatus::Planned))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_concurrent_writers_one_wins() {
        let store = MemorySessionStore::new();
        let s = store.create(&new_session("race", SessionKind::Metier, 2)).await.unwrap();

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.apply_change(s.id, 1, &cancel(SessionStatus::Planned)).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.apply_change(s.id, 1, &cancel(SessionStatus::Planned)).await })
        };
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(store.find_by_id(s.id).await.unwrap().unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_audit_filters_by_target() {
        let audit = MemoryAuditStore::new();
        let target = Uuid::new_v4();
        audit
            .append(&CreateAuditLogEntry::for_session(
                None,
                AuditAction::Start,
                target,
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        audit
            .append(&CreateAuditLogEntry::for_session(
                None,
                AuditAction::Start,
                Uuid::new_v4(),
                serde_json::json!({}),
            ))
            .await
            .unwrap();

        let entries = audit.find_by_target("session", target).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "session.start");
        assert_eq!(audit.len().await, 2);
    }
}
