//! Gate decisions and the validation queue.

use axum::Json;
use axum::extract::{Path, Query, State};

use trainhub_auth::rbac::SystemPermission;
use trainhub_entity::session::Session;
use trainhub_service::{PendingSessions, ValidationRequest};

use crate::dto::request::{PendingQuery, ValidateSessionRequest};
use crate::dto::response::{ApiResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_uuid};
use crate::handlers::sessions::with_actions;
use crate::middleware::rbac::require_permission;
use crate::state::AppState;

/// POST /api/sessions/{id}/validate
///
/// Role and state checks happen in the engine so the error kinds stay
/// the same for HTTP and CLI callers.
pub async fn validate_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ValidateSessionRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let session_id = parse_uuid(&id)?;
    let session = state
        .validation_engine
        .validate(
            &auth.actor,
            ValidationRequest {
                session_id,
                gate: req.gate,
                decision: req.approve.into(),
                expected_version: req.expected_version,
                reason: req.reason,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(with_actions(&state, &auth, session))))
}

/// GET /api/validations/pending
pub async fn pending(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PendingQuery>,
) -> Result<Json<ApiResponse<Vec<Session>>>, ApiError> {
    require_permission(&auth, &state.rbac, SystemPermission::ValidationQueueView)?;

    let queue: PendingSessions = if query.mine {
        state.validation_queue.list_pending_for(&auth.actor).await?
    } else {
        state.validation_queue.list_pending().await?
    };

    Ok(Json(ApiResponse::ok(queue.into_iter().collect())))
}
