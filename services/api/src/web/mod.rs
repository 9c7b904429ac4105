pub mod admin;
pub mod auth;
pub mod documents;
pub mod history;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod summaries;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use juris_resumo_core::intake::MAX_FILE_SIZE;
use std::sync::Arc;

pub use middleware::{require_admin, require_approved, require_auth};
pub use state::AppState;

/// Room for multipart framing around a maximum-size upload.
const BODY_LIMIT: usize = MAX_FILE_SIZE + 1024 * 1024;

/// Every API route with its access gate.
pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Any live session, approved or not
    let session_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth));

    // Approved users and admins
    let approved_routes = Router::new()
        .route("/documents/extract", post(documents::extract_document_handler))
        .route("/summaries", post(summaries::create_summary_handler))
        .route("/summaries/last", get(summaries::last_summary_handler))
        .route(
            "/history",
            get(history::list_history_handler).delete(history::clear_history_handler),
        )
        .route("/history/{id}", get(history::get_history_entry_handler))
        .route(
            "/history/{id}/export/{format}",
            get(history::export_history_entry_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_approved,
        ));

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users_handler))
        .route(
            "/admin/users/{id}/approval",
            put(admin::update_approval_handler),
        )
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(approved_routes)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}
