//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use chrono::{Duration, Utc};
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use trainhub_api::{AppState, build_app};
use trainhub_core::config::{AppConfig, PersistenceProvider};
use trainhub_core::types::UserId;
use trainhub_database::Stores;
use trainhub_entity::user::{Actor, UserRole};

/// Shared key used by tests that exercise the Moodle bridge.
pub const EMBED_KEY: &str = "moodle-bridge-test-key";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// State behind the router, for driving the scheduler directly
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application over the in-memory store
    pub fn new() -> Self {
        Self::with_stores(Stores::memory())
    }

    /// Create a test application over the given stores
    pub fn with_stores(stores: Stores) -> Self {
        let mut config = AppConfig::default();
        config.database.provider = PersistenceProvider::Memory;
        config.auth.jwt_secret = "integration-test-secret-value".to_string();
        config.auth.embed_shared_secret = EMBED_KEY.to_string();
        config.worker.enabled = false;

        let state = AppState::new(config, stores);
        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    /// Issue a bearer token for a fresh user with `role`.
    pub fn token(&self, role: UserRole) -> (Uuid, String) {
        let id = Uuid::new_v4();
        let actor = Actor::new(UserId::from_uuid(id), format!("{role}-user"), role);
        let token = self
            .state
            .jwt_encoder
            .issue_access_token(&actor)
            .expect("Failed to issue token");
        (id, token.access_token)
    }

    /// Create a session as an HR user; returns the session JSON.
    pub async fn create_session(&self, kind: &str) -> Value {
        let (_, hr) = self.token(UserRole::Hr);
        let start = Utc::now() + Duration::days(7);
        let response = self
            .request(
                "POST",
                "/api/sessions",
                Some(json!({
                    "title": format!("{kind} training"),
                    "kind": kind,
                    "start_time": start,
                    "end_time": start + Duration::hours(4),
                    "location": "Salle B",
                    "capacity": 12,
                })),
                Some(&hr),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"].clone()
    }

    /// Post a gate decision.
    pub async fn decide(
        &self,
        session_id: &str,
        gate: &str,
        approve: bool,
        token: &str,
    ) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/sessions/{session_id}/validate"),
            Some(json!({ "gate": gate, "approve": approve })),
            Some(token),
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, token, &[]).await
    }

    /// Make an HTTP request with extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// `data.status` of a session response.
    pub fn session_status(&self) -> &str {
        self.body["data"]["status"].as_str().unwrap_or_default()
    }

    /// `error` code of an error response.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
