//! Integration tests for the HR/HSE validation workflow over HTTP.

mod helpers;

use chrono::{DateTime, Duration, Utc};
use http::StatusCode;
use serde_json::json;

use trainhub_entity::user::UserRole;

fn id_of(session: &serde_json::Value) -> String {
    session["id"].as_str().expect("session id").to_string()
}

#[tokio::test]
async fn test_metier_session_needs_only_hr() {
    let app = helpers::TestApp::new();
    let session = app.create_session("metier").await;
    assert_eq!(session["status"], "planned");
    assert_eq!(session["version"], 1);

    let (_, hr) = app.token(UserRole::Hr);
    let response = app.decide(&id_of(&session), "hr", true, &hr).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.session_status(), "validated_hr");
    assert!(response.body["data"]["validated_hr_at"].is_string());
    assert!(response.body["data"]["validated_hse_at"].is_null());
    assert_eq!(response.body["data"]["legal_actions"], json!([]));
}

#[tokio::test]
async fn test_hse_session_passes_both_gates_in_order() {
    let app = helpers::TestApp::new();
    let session = app.create_session("HSE").await;
    let id = id_of(&session);
    assert_eq!(session["kind"], "hse");

    let (_, hse) = app.token(UserRole::Hse);
    let early = app.decide(&id, "hse", true, &hse).await;
    assert_eq!(early.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(early.error_code(), "INVALID_TRANSITION");

    let (_, drh) = app.token(UserRole::Drh);
    let hr_step = app.decide(&id, "hr", true, &drh).await;
    assert_eq!(hr_step.status, StatusCode::OK);
    assert_eq!(hr_step.session_status(), "awaiting_hse");

    let view = app
        .request("GET", &format!("/api/sessions/{id}"), None, Some(&hse))
        .await;
    assert_eq!(view.body["data"]["legal_actions"], json!(["hse"]));

    let hse_step = app.decide(&id, "hse", true, &hse).await;
    assert_eq!(hse_step.status, StatusCode::OK);
    assert_eq!(hse_step.session_status(), "validated_hse");
    assert!(hse_step.body["data"]["validated_hr_at"].is_string());
    assert!(hse_step.body["data"]["validated_hse_at"].is_string());
}

#[tokio::test]
async fn test_hse_gate_does_not_exist_for_metier() {
    let app = helpers::TestApp::new();
    let session = app.create_session("metier").await;
    let (_, hse) = app.token(UserRole::Hse);

    let response = app.decide(&id_of(&session), "hse", true, &hse).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_wrong_role_is_forbidden_and_leaves_session_untouched() {
    let app = helpers::TestApp::new();
    let session = app.create_session("hse").await;
    let id = id_of(&session);

    for role in [UserRole::Hse, UserRole::Manager, UserRole::Admin, UserRole::Employee] {
        let (_, token) = app.token(role);
        let response = app.decide(&id, "hr", true, &token).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "role {role}");
    }

    let (_, hr) = app.token(UserRole::Hr);
    let view = app
        .request("GET", &format!("/api/sessions/{id}"), None, Some(&hr))
        .await;
    assert_eq!(view.session_status(), "planned");
    assert_eq!(view.body["data"]["version"], 1);
}

#[tokio::test]
async fn test_rejection_cancels_and_is_final() {
    let app = helpers::TestApp::new();
    let session = app.create_session("hse").await;
    let id = id_of(&session);

    let (_, hr) = app.token(UserRole::Hr);
    app.decide(&id, "hr", true, &hr).await;

    let (hse_id, hse) = app.token(UserRole::Hse);
    let rejected = app
        .request(
            "POST",
            &format!("/api/sessions/{id}/validate"),
            Some(json!({ "gate": "hse", "approve": false, "reason": "EPI non disponibles" })),
            Some(&hse),
        )
        .await;

    assert_eq!(rejected.status, StatusCode::OK);
    assert_eq!(rejected.session_status(), "cancelled");
    let data = &rejected.body["data"];
    assert_eq!(data["cancellation_reason"], "EPI non disponibles");
    assert_eq!(data["cancelled_by"], hse_id.to_string());
    assert!(data["validated_hse_at"].is_null());

    // Nothing moves a cancelled session.
    let again = app.decide(&id, "hse", true, &hse).await;
    assert_eq!(again.status, StatusCode::UNPROCESSABLE_ENTITY);
    let hr_again = app.decide(&id, "hr", true, &hr).await;
    assert_eq!(hr_again.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_repeated_hr_approval_keeps_first_stamp() {
    let app = helpers::TestApp::new();
    let session = app.create_session("metier").await;
    let id = id_of(&session);

    let (first_id, first) = app.token(UserRole::Hr);
    let approved = app.decide(&id, "hr", true, &first).await;
    let stamp = approved.body["data"]["validated_hr_at"].clone();

    let (_, second) = app.token(UserRole::Hr);
    let repeat = app.decide(&id, "hr", true, &second).await;
    assert_eq!(repeat.status, StatusCode::UNPROCESSABLE_ENTITY);

    let view = app
        .request("GET", &format!("/api/sessions/{id}"), None, Some(&first))
        .await;
    assert_eq!(view.body["data"]["validated_hr_at"], stamp);
    assert_eq!(view.body["data"]["validated_hr_by"], first_id.to_string());
}

#[tokio::test]
async fn test_stale_expected_version_conflicts() {
    let app = helpers::TestApp::new();
    let session = app.create_session("hse").await;
    let id = id_of(&session);
    let (_, hr) = app.token(UserRole::Hr);

    let response = app
        .request(
            "POST",
            &format!("/api/sessions/{id}/validate"),
            Some(json!({ "gate": "hr", "approve": true, "expected_version": 7 })),
            Some(&hr),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");

    let fresh = app
        .request(
            "POST",
            &format!("/api/sessions/{id}/validate"),
            Some(json!({ "gate": "hr", "approve": true, "expected_version": 1 })),
            Some(&hr),
        )
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
    assert_eq!(fresh.body["data"]["version"], 2);
}

#[tokio::test]
async fn test_pending_queue_and_mine_filter() {
    let app = helpers::TestApp::new();
    let planned = app.create_session("hse").await;
    let awaiting = app.create_session("hse").await;
    let done = app.create_session("metier").await;

    let (_, hr) = app.token(UserRole::Hr);
    app.decide(&id_of(&awaiting), "hr", true, &hr).await;
    app.decide(&id_of(&done), "hr", true, &hr).await;

    let (_, manager) = app.token(UserRole::Manager);
    let all = app
        .request("GET", "/api/validations/pending", None, Some(&manager))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    let ids: Vec<&str> = all.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["id"].as_str())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&id_of(&planned).as_str()));
    assert!(ids.contains(&id_of(&awaiting).as_str()));

    let (_, hse) = app.token(UserRole::Hse);
    let mine = app
        .request("GET", "/api/validations/pending?mine=true", None, Some(&hse))
        .await;
    let mine = mine.body["data"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["status"], "awaiting_hse");

    let (_, trainer) = app.token(UserRole::Trainer);
    let denied = app
        .request("GET", "/api/validations/pending", None, Some(&trainer))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_schedule_moves_validated_sessions_only() {
    let app = helpers::TestApp::new();
    let validated = app.create_session("metier").await;
    let untouched = app.create_session("metier").await;
    let (_, hr) = app.token(UserRole::Hr);
    app.decide(&id_of(&validated), "hr", true, &hr).await;

    let end: DateTime<Utc> = validated["end_time"].as_str().unwrap().parse().unwrap();
    let later = end + Duration::minutes(1);

    let first = app.state.schedule_service.advance_due(later).await.unwrap();
    assert_eq!(first.started, 1);
    let second = app.state.schedule_service.advance_due(later).await.unwrap();
    assert_eq!(second.completed, 1);

    let view = app
        .request(
            "GET",
            &format!("/api/sessions/{}", id_of(&validated)),
            None,
            Some(&hr),
        )
        .await;
    assert_eq!(view.session_status(), "completed");

    let other = app
        .request(
            "GET",
            &format!("/api/sessions/{}", id_of(&untouched)),
            None,
            Some(&hr),
        )
        .await;
    assert_eq!(other.session_status(), "planned");
}

#[tokio::test]
async fn test_audit_trail_records_each_step() {
    let app = helpers::TestApp::new();
    let session = app.create_session("hse").await;
    let id = id_of(&session);

    let (_, hr) = app.token(UserRole::Hr);
    app.decide(&id, "hr", true, &hr).await;
    let (_, hse) = app.token(UserRole::Hse);
    app.decide(&id, "hse", false, &hse).await;

    let trail = app
        .request("GET", &format!("/api/sessions/{id}/audit"), None, Some(&hse))
        .await;
    assert_eq!(trail.status, StatusCode::OK);
    let actions: Vec<&str> = trail.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["action"].as_str())
        .collect();
    assert_eq!(
        actions,
        vec!["session.create", "session.validate_hr", "session.reject_hse"]
    );

    let (_, employee) = app.token(UserRole::Employee);
    let denied = app
        .request("GET", &format!("/api/sessions/{id}/audit"), None, Some(&employee))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_rules() {
    let app = helpers::TestApp::new();
    let start = Utc::now() + Duration::days(1);

    let (_, hse) = app.token(UserRole::Hse);
    let forbidden = app
        .request(
            "POST",
            "/api/sessions",
            Some(json!({
                "title": "Incendie",
                "kind": "hse",
                "start_time": start,
                "end_time": start + Duration::hours(2),
            })),
            Some(&hse),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let (_, hr) = app.token(UserRole::Hr);
    let backwards = app
        .request(
            "POST",
            "/api/sessions",
            Some(json!({
                "title": "Incendie",
                "kind": "hse",
                "start_time": start,
                "end_time": start - Duration::hours(2),
            })),
            Some(&hr),
        )
        .await;
    assert_eq!(backwards.status, StatusCode::BAD_REQUEST);
    assert_eq!(backwards.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = helpers::TestApp::new();
    let (_, hr) = app.token(UserRole::Hr);

    let missing = app
        .decide("6f1c1f5e-7a0e-4a35-9d7e-0b3a1c1e2f10", "hr", true, &hr)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app
        .request("GET", "/api/sessions/not-a-uuid", None, Some(&hr))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let app = helpers::TestApp::new();
    let a = app.create_session("metier").await;
    app.create_session("metier").await;
    let (_, hr) = app.token(UserRole::Hr);
    app.decide(&id_of(&a), "hr", true, &hr).await;

    let listed = app
        .request(
            "GET",
            "/api/sessions?status=validated_hr&page=1&per_page=10",
            None,
            Some(&hr),
        )
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"]["total_items"], 1);
    assert_eq!(listed.body["data"]["items"][0]["id"], id_of(&a));

    let bad = app
        .request("GET", "/api/sessions?status=archived", None, Some(&hr))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}
