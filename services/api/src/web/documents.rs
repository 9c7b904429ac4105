//! services/api/src/web/documents.rs
//!
//! Turns an uploaded PDF or DOCX into case text.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use juris_resumo_core::{
    intake::{ingest_upload, IntakeError, UploadedFile},
    ports::ExtractionError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::web::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub file_name: String,
    pub text: String,
    /// Set when the text was cut to the maximum length.
    pub truncated: bool,
}

fn intake_error(e: IntakeError) -> (StatusCode, String) {
    let status = match &e {
        IntakeError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        IntakeError::Extraction(ExtractionError::UnsupportedType(_)) => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        IntakeError::Extraction(ExtractionError::Extraction(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    warn!("Upload rejected: {}", e);
    (status, e.to_string())
}

/// POST /documents/extract - Extract the text of an uploaded case file
///
/// Accepts a multipart/form-data request with a single file part. The part's
/// declared content type selects the parser.
#[utoipa::path(
    post,
    path = "/documents/extract",
    request_body(content_type = "multipart/form-data", description = "The PDF or DOCX to read."),
    responses(
        (status = 200, description = "Extracted text", body = ExtractResponse),
        (status = 400, description = "No file in the request"),
        (status = 413, description = "File larger than 50 MB"),
        (status = 415, description = "Neither PDF nor DOCX"),
        (status = 422, description = "The file could not be parsed"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn extract_document_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| (e.status(), e.body_text()))?
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "Multipart form must include a file".to_string(),
            )
        })?;

    let file_name = field.file_name().unwrap_or("upload").to_string();
    let mime_type = field.content_type().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| (e.status(), e.body_text()))?;

    let upload = UploadedFile {
        file_name: file_name.clone(),
        mime_type,
        bytes: bytes.to_vec(),
    };

    // Parsing is CPU-bound; keep it off the async workers.
    let extractor = state.extractor.clone();
    let intake = tokio::task::spawn_blocking(move || ingest_upload(extractor.as_ref(), &upload))
        .await
        .map_err(|e| {
            error!("Extraction task failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process the file".to_string(),
            )
        })?
        .map_err(intake_error)?;

    info!(
        "Extracted {} chars from '{}'{}",
        intake.text.chars().count(),
        file_name,
        if intake.truncated { " (truncated)" } else { "" }
    );

    Ok(Json(ExtractResponse {
        file_name,
        text: intake.text,
        truncated: intake.truncated,
    }))
}
