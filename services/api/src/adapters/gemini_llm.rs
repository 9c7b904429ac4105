//! services/api/src/adapters/gemini_llm.rs
//!
//! This module contains the adapter for Google's Gemini `generateContent` API.
//! It implements the `SummaryGenerator` port from the `core` crate.

use async_trait::async_trait;
use juris_resumo_core::{
    domain::{SummaryKind, SummarySize},
    ports::{ProviderError, SummaryGenerator},
    prompts::build_prompt,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentRequest {
    /// The prompt and the case text travel as a single user turn.
    fn single_turn(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        Some(text)
    }
}

/// Maps a non-2xx Gemini reply onto the provider error taxonomy.
fn translate_error(status: u16, body: &str) -> ProviderError {
    if body.contains("API_KEY_INVALID") || body.contains("API key not valid") {
        return ProviderError::InvalidCredential(
            "The Google API key was rejected. Check GEMINI_API_KEY.".to_string(),
        );
    }
    ProviderError::ProviderUnavailable(format!("Gemini returned status {}: {}", status, body))
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummaryGenerator` on top of Gemini.
#[derive(Clone)]
pub struct GeminiSummaryAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiSummaryAdapter {
    /// Creates a new `GeminiSummaryAdapter`. A missing key is only reported when a
    /// summary is requested.
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

//=========================================================================================
// `SummaryGenerator` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummaryGenerator for GeminiSummaryAdapter {
    async fn generate(
        &self,
        text: &str,
        kind: SummaryKind,
        size: SummarySize,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingCredential("GEMINI_API_KEY".to_string()))?;

        let request = GenerateContentRequest::single_turn(build_prompt(kind, size, text));
        debug!("Gemini {} summary request to model={}", kind, self.model);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                ProviderError::ProviderUnavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini returned {}: {}", status, body);
            return Err(translate_error(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ProviderUnavailable(e.to_string()))?;

        match parsed.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ProviderError::ProviderUnavailable(
                "Gemini response contained no text content.".to_string(),
            )),
        }
    }
}
