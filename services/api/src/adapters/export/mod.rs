//! services/api/src/adapters/export/mod.rs
//!
//! Renders a history entry as a downloadable file. JSON and CSV serialize the
//! record itself; PDF and DOCX lay out one summary variant.

mod docx;
mod pdf;

use juris_resumo_core::domain::{SummaryEntry, SummaryKind};
use std::str::FromStr;

pub const FALLBACK_FILE_STEM: &str = "summary_export";

const CSV_COLUMNS: [&str; 7] = [
    "id",
    "date",
    "processNumber",
    "summaryTechnical",
    "summarySimplified",
    "originalFileName",
    "rawText",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
    #[error("DOCX rendering failed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// A rendered export ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `summary_<case number>.<ext>` with every character outside `[A-Za-z0-9_]`
/// replaced by `_`.
pub fn export_file_name(process_number: &str, format: ExportFormat) -> String {
    let sanitized: String = process_number
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        format!("{}.{}", FALLBACK_FILE_STEM, format.extension())
    } else {
        format!("summary_{}.{}", sanitized, format.extension())
    }
}

pub fn to_json(entry: &SummaryEntry) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(entry)?)
}

/// Header row, `\r\n`, then one row of JSON-quoted values.
pub fn to_csv(entry: &SummaryEntry) -> Result<Vec<u8>, ExportError> {
    let values = [
        entry.id.as_str(),
        entry.date.as_str(),
        entry.process_number.as_str(),
        entry.summary_technical.as_str(),
        entry.summary_simplified.as_str(),
        entry.original_file_name.as_deref().unwrap_or(""),
        entry.raw_text.as_str(),
    ]
    .iter()
    .map(serde_json::to_string)
    .collect::<Result<Vec<_>, _>>()?;

    Ok(format!("{}\r\n{}", CSV_COLUMNS.join(","), values.join(",")).into_bytes())
}

pub fn export_entry(
    entry: &SummaryEntry,
    format: ExportFormat,
    variant: SummaryKind,
) -> Result<ExportedFile, ExportError> {
    let bytes = match format {
        ExportFormat::Json => to_json(entry)?,
        ExportFormat::Csv => to_csv(entry)?,
        ExportFormat::Pdf => pdf::render(&entry.process_number, entry.summary(variant))?,
        ExportFormat::Docx => docx::render(&entry.process_number, entry.summary(variant))?,
    };
    Ok(ExportedFile {
        file_name: export_file_name(&entry.process_number, format),
        content_type: format.content_type(),
        bytes,
    })
}

/// Heading shared by the document formats.
fn title(process_number: &str) -> String {
    format!("Resumo do Processo: {}", process_number)
}
