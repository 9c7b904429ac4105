//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification.

use crate::web::{admin, auth, documents, history, summaries};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        admin::list_users_handler,
        admin::update_approval_handler,
        documents::extract_document_handler,
        summaries::create_summary_handler,
        summaries::last_summary_handler,
        history::list_history_handler,
        history::clear_history_handler,
        history::get_history_entry_handler,
        history::export_history_entry_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserView,
            auth::MeResponse,
            admin::ApprovalRequest,
            documents::ExtractResponse,
            summaries::SummarizeRequest,
            summaries::SummarizeResponse,
            summaries::LastGenerationResponse,
            history::SummaryEntryView,
            history::HistoryItem,
        )
    ),
    tags(
        (name = "JurisResumo API", description = "Summaries of legal case files for approved users.")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/register",
            "/auth/login",
            "/auth/logout",
            "/auth/me",
            "/admin/users",
            "/admin/users/{id}/approval",
            "/documents/extract",
            "/summaries",
            "/summaries/last",
            "/history",
            "/history/{id}",
            "/history/{id}/export/{format}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} is missing");
        }
    }
}
