//! Current actor endpoint.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, MeResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Json<ApiResponse<MeResponse>> {
    let actor = &auth.actor;
    Json(ApiResponse::ok(MeResponse {
        id: auth.user_id(),
        username: actor.username.clone(),
        role: actor.role,
        permissions: state.rbac.policies().permissions_for_role(&actor.role),
    }))
}
