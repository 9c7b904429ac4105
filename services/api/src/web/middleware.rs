//! services/api/src/web/middleware.rs
//!
//! Authentication and authorization middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use juris_resumo_core::domain::AccessLevel;
use std::sync::Arc;
use tracing::debug;

use crate::web::state::{AppState, CurrentUser};

pub const SESSION_COOKIE: &str = "session";

/// The session token of a request: the `session` cookie, or else an
/// `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Resolves the session and checks it reaches `required`.
///
/// No session (or an expired one) is 401; a live session below the required
/// level is 403.
async fn authorize(
    state: &AppState,
    req: &mut Request,
    required: AccessLevel,
) -> Result<(), StatusCode> {
    let token = session_token(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;
    let user = state
        .auth
        .current_user(&token)
        .await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let level = AccessLevel::of(Some(&user));
    if level < required {
        debug!(
            "User {} ({}) denied a route requiring {}",
            user.id,
            level.as_str(),
            required.as_str()
        );
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(CurrentUser { token, user });
    Ok(())
}

/// Any logged-in user, approved or not.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, &mut req, AccessLevel::Pending).await?;
    Ok(next.run(req).await)
}

/// Approved users and admins.
pub async fn require_approved(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, &mut req, AccessLevel::Approved).await?;
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, &mut req, AccessLevel::Admin).await?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc"),
        );
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn bearer_is_used_without_a_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn similar_cookie_names_and_empty_values_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_id=nope; session="),
        );
        assert_eq!(session_token(&headers), None);
    }
}
