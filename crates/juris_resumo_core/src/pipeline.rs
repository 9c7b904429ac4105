//! crates/juris_resumo_core/src/pipeline.rs
//!
//! One summarization round: validate, cap the text, fan out to the generator,
//! build the history entry, persist it and refresh the last-generation cache.

use crate::domain::{GenerationOptions, Summaries, SummaryEntry};
use crate::history::{new_entry, HistoryStore, LastGenerationCache};
use crate::intake::truncate_text;
use crate::ports::ProviderError;
use crate::summarize::SummarizationClient;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

/// Below this many characters a summary is suspiciously short.
pub const SHORT_SUMMARY_THRESHOLD: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("Please provide some text or upload a file.")]
    EmptyText,
    #[error("Select at least one summary type to generate.")]
    NoSummaryTypeSelected,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("The provider returned no summary text.")]
    NoSummaryProduced,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub entry: SummaryEntry,
    pub summaries: Summaries,
    pub text_truncated: bool,
    /// Set when every returned summary is shorter than `SHORT_SUMMARY_THRESHOLD`.
    pub short_output_warning: bool,
}

pub struct SummaryPipeline {
    client: SummarizationClient,
    history: Arc<HistoryStore>,
    last_generation: Arc<LastGenerationCache>,
}

impl SummaryPipeline {
    pub fn new(
        client: SummarizationClient,
        history: Arc<HistoryStore>,
        last_generation: Arc<LastGenerationCache>,
    ) -> Self {
        Self {
            client,
            history,
            last_generation,
        }
    }

    pub async fn run(
        &self,
        text: &str,
        original_file_name: Option<String>,
        options: &GenerationOptions,
    ) -> Result<GenerationOutcome, SummarizeError> {
        if text.trim().is_empty() {
            return Err(SummarizeError::EmptyText);
        }
        if options.is_empty() {
            return Err(SummarizeError::NoSummaryTypeSelected);
        }

        let capped = truncate_text(text);
        let summaries = self.client.generate_summaries(&capped.text, options).await?;
        if !summaries.has_content() {
            return Err(SummarizeError::NoSummaryProduced);
        }

        let entry = new_entry(&summaries, &capped.text, original_file_name, Utc::now());

        // storage failures are logged, not returned
        if let Err(e) = self.history.save_summary(entry.clone()).await {
            error!("Failed to save summary {} to history: {}", entry.id, e);
        }
        if let Err(e) = self.last_generation.save(&summaries, &capped.text).await {
            error!("Failed to cache last generation: {}", e);
        }

        let short_output_warning = [&entry.summary_technical, &entry.summary_simplified]
            .iter()
            .all(|s| s.chars().count() < SHORT_SUMMARY_THRESHOLD);

        info!(
            "Generated summaries for case '{}' (entry {})",
            entry.process_number, entry.id
        );

        Ok(GenerationOutcome {
            entry,
            summaries,
            text_truncated: capped.truncated,
            short_output_warning,
        })
    }
}
