//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, logout and the current user.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use juris_resumo_core::{
    auth::{validate_registration, AuthError, SESSION_TTL_DAYS},
    domain::{AccessLevel, User},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::web::middleware::{session_token, SESSION_COOKIE};
use crate::web::state::{AppState, CurrentUser};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user without credentials.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub is_approved: bool,
    pub is_admin: bool,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_approved: user.is_approved,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserView,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: UserView,
    /// One of `pending`, `approved`, `admin`.
    pub access_level: String,
}

/// Maps an auth failure onto a status and a user-facing message.
pub fn auth_error(e: AuthError) -> (StatusCode, String) {
    match e {
        AuthError::DuplicateEmail => (StatusCode::CONFLICT, e.to_string()),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, e.to_string()),
        AuthError::Validation(message) => (StatusCode::BAD_REQUEST, message),
        AuthError::Storage(inner) => {
            error!("Auth storage failure: {:?}", inner);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to access user records".to_string(),
            )
        }
    }
}

fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        Duration::days(SESSION_TTL_DAYS).num_seconds()
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create an account awaiting admin approval
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created, pending approval", body = UserView),
        (status = 400, description = "Invalid registration form"),
        (status = 409, description = "E-mail already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    validate_registration(&req.email, &req.password, &req.confirm_password).map_err(auth_error)?;

    let user = state
        .auth
        .register(req.email.trim(), &req.password)
        .await
        .map_err(auth_error)?;

    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// POST /auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .auth
        .login(req.email.trim(), &req.password)
        .await
        .map_err(auth_error)?;

    info!("User {} logged in", session.user.id);
    let cookie = session_cookie(&session.token);
    let response = LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: session.user.into(),
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /auth/logout - End the current session
///
/// Succeeds with or without a live session.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out; the session cookie is cleared")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.auth.logout(&token).await;
    }

    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    (StatusCode::OK, [(header::SET_COOKIE, cookie)])
}

/// GET /auth/me - The logged-in user and what it may access
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "No active session")
    )
)]
pub async fn me_handler(Extension(current): Extension<CurrentUser>) -> Json<MeResponse> {
    let access_level = AccessLevel::of(Some(&current.user)).as_str().to_string();
    Json(MeResponse {
        user: current.user.into(),
        access_level,
    })
}
