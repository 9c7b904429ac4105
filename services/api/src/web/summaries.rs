//! services/api/src/web/summaries.rs
//!
//! Summary generation and the last-generation cache.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use juris_resumo_core::{
    domain::{GenerationOptions, SummarySize},
    pipeline::SummarizeError,
    ports::ProviderError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::web::history::SummaryEntryView;
use crate::web::state::AppState;

fn yes() -> bool {
    true
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Pasted text or the text returned by `/documents/extract`.
    pub text: String,
    /// Name of the uploaded file the text came from, if any.
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default = "yes")]
    pub generate_technical: bool,
    #[serde(default = "yes")]
    pub generate_simplified: bool,
    #[serde(default)]
    #[schema(value_type = String, example = "medium")]
    pub size: SummarySize,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResponse {
    pub entry: SummaryEntryView,
    /// The input was cut to the maximum length before summarizing.
    pub text_truncated: bool,
    /// Every returned summary is suspiciously short.
    pub short_output_warning: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LastGenerationResponse {
    pub technical: String,
    pub simplified: String,
    pub raw_text: String,
}

fn summarize_error(e: SummarizeError) -> (StatusCode, String) {
    let status = match &e {
        SummarizeError::EmptyText | SummarizeError::NoSummaryTypeSelected => {
            StatusCode::BAD_REQUEST
        }
        SummarizeError::Provider(ProviderError::MissingCredential(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        SummarizeError::Provider(_) | SummarizeError::NoSummaryProduced => StatusCode::BAD_GATEWAY,
    };
    if status != StatusCode::BAD_REQUEST {
        error!("Summary generation failed: {}", e);
    }
    (status, e.to_string())
}

/// POST /summaries - Summarize a case text
#[utoipa::path(
    post,
    path = "/summaries",
    request_body = SummarizeRequest,
    responses(
        (status = 201, description = "Summaries generated and saved to history", body = SummarizeResponse),
        (status = 400, description = "No text or no summary type selected"),
        (status = 502, description = "The LLM provider failed or rejected the key"),
        (status = 503, description = "No API key configured for the provider")
    )
)]
pub async fn create_summary_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let options = GenerationOptions {
        generate_technical: req.generate_technical,
        generate_simplified: req.generate_simplified,
        size: req.size,
    };

    let outcome = state
        .pipeline
        .run(&req.text, req.file_name, &options)
        .await
        .map_err(summarize_error)?;

    let response = SummarizeResponse {
        entry: outcome.entry.into(),
        text_truncated: outcome.text_truncated,
        short_output_warning: outcome.short_output_warning,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /summaries/last - The most recent generation
#[utoipa::path(
    get,
    path = "/summaries/last",
    responses(
        (status = 200, description = "Last generated summaries", body = LastGenerationResponse),
        (status = 404, description = "Nothing generated yet")
    )
)]
pub async fn last_summary_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LastGenerationResponse>, (StatusCode, String)> {
    let last = state.last_generation.load().await.ok_or((
        StatusCode::NOT_FOUND,
        "No summary has been generated yet".to_string(),
    ))?;

    Ok(Json(LastGenerationResponse {
        technical: last.summaries.technical,
        simplified: last.summaries.simplified,
        raw_text: last.raw_text,
    }))
}
