//! Training session handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use trainhub_auth::rbac::SystemPermission;
use trainhub_core::types::pagination::PageResponse;
use trainhub_entity::audit::AuditLogEntry;
use trainhub_entity::session::Session;

use crate::dto::request::{CreateSessionRequest, StatusFilter};
use crate::dto::response::{ApiResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson, parse_uuid};
use crate::middleware::rbac::require_permission;
use crate::state::AppState;

/// Attach the caller's legal gate decisions to a session.
pub(crate) fn with_actions(state: &AppState, auth: &AuthUser, session: Session) -> SessionResponse {
    let legal_actions = state.validation_engine.legal_actions(&session, &auth.actor);
    SessionResponse {
        session,
        legal_actions,
    }
}

/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<StatusFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Session>>>, ApiError> {
    let statuses = filter.statuses()?;
    let page = state
        .session_service
        .list(&auth, &statuses, &pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), ApiError> {
    let session = state.session_service.create(&auth, req.into()).await?;
    let body = with_actions(&state, &auth, session);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(body))))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    let session = state.session_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(with_actions(&state, &auth, session))))
}

/// GET /api/sessions/{id}/audit
pub async fn session_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AuditLogEntry>>>, ApiError> {
    require_permission(&auth, &state.rbac, SystemPermission::AuditView)?;
    let id = parse_uuid(&id)?;
    // 404 for unknown sessions rather than an empty trail.
    state.session_service.find(id).await?;
    let trail = state.audit_service.session_trail(&auth, id).await?;
    Ok(Json(ApiResponse::ok(trail)))
}
