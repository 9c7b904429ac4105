//! services/api/src/web/admin.rs
//!
//! User management for administrators.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::web::auth::{auth_error, UserView};
use crate::web::state::{AppState, CurrentUser};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub is_approved: bool,
}

/// GET /admin/users - Every registered user
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All users", body = [UserView]),
        (status = 401, description = "No active session"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_users_handler(State(state): State<Arc<AppState>>) -> Json<Vec<UserView>> {
    let users = state.auth.all_users().await;
    Json(users.into_iter().map(UserView::from).collect())
}

/// PUT /admin/users/{id}/approval - Approve or revoke a user
///
/// Unknown ids are accepted and change nothing.
#[utoipa::path(
    put,
    path = "/admin/users/{id}/approval",
    request_body = ApprovalRequest,
    params(
        ("id" = String, Path, description = "The user's id.")
    ),
    responses(
        (status = 204, description = "Approval updated"),
        (status = 401, description = "No active session"),
        (status = 403, description = "Not an administrator"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_approval_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    Json(req): Json<ApprovalRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let changed = state
        .auth
        .update_user_approval(&user_id, req.is_approved)
        .await
        .map_err(auth_error)?;

    if changed {
        info!(
            "Admin {} set approval of {} to {}",
            admin.user.id, user_id, req.is_approved
        );
    }
    Ok(StatusCode::NO_CONTENT)
}
