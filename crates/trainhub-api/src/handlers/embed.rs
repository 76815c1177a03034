//! Moodle embedding bridge.
//!
//! The LMS plugin posts its user with the shared key and receives a
//! short-lived bearer token for the embedded widget.

use axum::Json;
use axum::extract::State;

use trainhub_auth::jwt::IssuedToken;
use trainhub_core::types::UserId;
use trainhub_entity::user::{Actor, UserRole};

use crate::dto::request::EmbedTokenRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{EmbedCaller, ValidatedJson};
use crate::state::AppState;

/// POST /api/embed/token
pub async fn issue_token(
    State(state): State<AppState>,
    _caller: EmbedCaller,
    ValidatedJson(req): ValidatedJson<EmbedTokenRequest>,
) -> Result<Json<ApiResponse<IssuedToken>>, ApiError> {
    let role: UserRole = req.role.parse()?;
    let actor = Actor::new(UserId::from_uuid(req.user_id), req.username, role);
    let token = state.jwt_encoder.issue_access_token(&actor)?;

    tracing::info!(
        actor_id = %req.user_id,
        role = %role,
        "Issued embed access token"
    );

    Ok(Json(ApiResponse::ok(token)))
}
