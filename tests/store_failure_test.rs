//! Integration tests for a session store that fails mid-request.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use trainhub_core::error::AppError;
use trainhub_core::result::AppResult;
use trainhub_core::types::pagination::{PageRequest, PageResponse};
use trainhub_database::store::memory::{MemoryAuditStore, MemorySessionStore};
use trainhub_database::{SessionStore, Stores};
use trainhub_entity::session::{CreateSession, Session, SessionChange, SessionStatus};
use trainhub_entity::user::UserRole;

/// Reads and inserts work; every conditional update fails.
#[derive(Debug, Default)]
struct ReadOnlyStore {
    inner: MemorySessionStore,
}

#[async_trait]
impl SessionStore for ReadOnlyStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_status(&self, statuses: &[SessionStatus]) -> AppResult<Vec<Session>> {
        self.inner.find_by_status(statuses).await
    }

    async fn list(
        &self,
        statuses: &[SessionStatus],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Session>> {
        self.inner.list(statuses, page).await
    }

    async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        self.inner.create(data).await
    }

    async fn apply_change(
        &self,
        _id: Uuid,
        _expected_version: i64,
        _change: &SessionChange,
    ) -> AppResult<Session> {
        Err(AppError::database(
            "could not serialize access due to concurrent update on training_sessions",
        ))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[tokio::test]
async fn test_failed_write_is_a_generic_500_and_leaves_the_session() {
    let app = helpers::TestApp::with_stores(Stores {
        sessions: Arc::new(ReadOnlyStore::default()),
        audit: Arc::new(MemoryAuditStore::new()),
    });
    let session = app.create_session("hse").await;
    let id = session["id"].as_str().unwrap();

    let (_, hr) = app.token(UserRole::Hr);
    let response = app.decide(id, "hr", true, &hr).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body,
        json!({ "error": "INTERNAL_ERROR", "message": "An internal error occurred" })
    );

    let current = app
        .request("GET", &format!("/api/sessions/{id}"), None, Some(&hr))
        .await;
    assert_eq!(current.status, StatusCode::OK);
    assert_eq!(current.session_status(), "planned");
    assert_eq!(current.body["data"]["version"], 1);
    assert!(current.body["data"]["validated_hr_at"].is_null());

    let trail = app
        .request("GET", &format!("/api/sessions/{id}/audit"), None, Some(&hr))
        .await;
    assert_eq!(trail.status, StatusCode::OK);
    let actions: Vec<&str> = trail.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["action"].as_str())
        .collect();
    assert_eq!(actions, vec!["session.create"]);
}
