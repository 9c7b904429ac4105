//! services/api/src/web/history.rs
//!
//! Browsing, clearing and exporting saved summaries.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use juris_resumo_core::{
    domain::{SummaryEntry, SummaryKind},
    history::search,
    markup::strip_bold_markers,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

use crate::adapters::export::{export_entry, ExportFormat};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// A saved summary, as stored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntryView {
    pub id: String,
    pub date: String,
    pub process_number: String,
    pub summary_technical: String,
    pub summary_simplified: String,
    pub original_file_name: Option<String>,
    pub raw_text: String,
}

impl From<SummaryEntry> for SummaryEntryView {
    fn from(entry: SummaryEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            process_number: entry.process_number,
            summary_technical: entry.summary_technical,
            summary_simplified: entry.summary_simplified,
            original_file_name: entry.original_file_name,
            raw_text: entry.raw_text,
        }
    }
}

/// One row of the history list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub date: String,
    pub process_number: String,
    pub original_file_name: Option<String>,
    /// The technical summary without bold markers.
    pub preview: String,
}

impl From<SummaryEntry> for HistoryItem {
    fn from(entry: SummaryEntry) -> Self {
        Self {
            preview: strip_bold_markers(&entry.summary_technical),
            id: entry.id,
            date: entry.date,
            process_number: entry.process_number,
            original_file_name: entry.original_file_name,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Case number fragment or date (`dd/mm/yyyy` or ISO).
    pub q: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// `technical` (default) or `simplified`; used by `pdf` and `docx`.
    pub variant: Option<String>,
}

fn not_found(id: &str) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("History entry {} not found", id),
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /history - Saved summaries, newest first
#[utoipa::path(
    get,
    path = "/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Matching entries, newest first", body = [HistoryItem])
    )
)]
pub async fn list_history_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<HistoryItem>> {
    let entries = state.history.get_history().await;
    let matched = search(entries, query.q.as_deref().unwrap_or_default());
    Json(matched.into_iter().map(HistoryItem::from).collect())
}

/// DELETE /history - Remove every saved summary
#[utoipa::path(
    delete,
    path = "/history",
    responses(
        (status = 204, description = "History cleared"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn clear_history_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.history.clear_history().await.map_err(|e| {
        error!("Failed to clear history: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to clear history".to_string(),
        )
    })?;
    info!("History cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /history/{id} - A single saved summary
#[utoipa::path(
    get,
    path = "/history/{id}",
    params(
        ("id" = String, Path, description = "The entry id (its creation timestamp).")
    ),
    responses(
        (status = 200, description = "The entry", body = SummaryEntryView),
        (status = 404, description = "No such entry")
    )
)]
pub async fn get_history_entry_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SummaryEntryView>, (StatusCode, String)> {
    let entry = state.history.find(&id).await.ok_or_else(|| not_found(&id))?;
    Ok(Json(entry.into()))
}

/// GET /history/{id}/export/{format} - Download an entry as a file
#[utoipa::path(
    get,
    path = "/history/{id}/export/{format}",
    params(
        ("id" = String, Path, description = "The entry id."),
        ("format" = String, Path, description = "One of json, csv, pdf, docx."),
        ExportQuery
    ),
    responses(
        (status = 200, description = "The file, as an attachment"),
        (status = 400, description = "Unknown format or variant"),
        (status = 404, description = "No such entry"),
        (status = 500, description = "Rendering failed")
    )
)]
pub async fn export_history_entry_handler(
    State(state): State<Arc<AppState>>,
    Path((id, format)): Path<(String, String)>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let format: ExportFormat = format
        .parse()
        .map_err(|e: String| (StatusCode::BAD_REQUEST, e))?;
    let variant: SummaryKind = match query.variant.as_deref() {
        Some(v) => v.parse().map_err(|e: String| (StatusCode::BAD_REQUEST, e))?,
        None => SummaryKind::default(),
    };

    let entry = state.history.find(&id).await.ok_or_else(|| not_found(&id))?;
    let file = export_entry(&entry, format, variant).map_err(|e| {
        error!("Failed to export entry {}: {}", id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to export the summary".to_string(),
        )
    })?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}
