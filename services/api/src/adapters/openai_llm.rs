//! services/api/src/adapters/openai_llm.rs
//!
//! This module contains the adapter for OpenAI-compatible chat completion APIs
//! (OpenAI itself and Groq). It implements the `SummaryGenerator` port from the
//! `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use juris_resumo_core::{
    domain::{SummaryKind, SummarySize},
    ports::{ProviderError, SummaryGenerator},
    prompts::build_prompt,
};
use tracing::{debug, error};

const TEMPERATURE: f32 = 0.1;
const MAX_COMPLETION_TOKENS: u32 = 4000;
const GROQ_KEY_PREFIX: &str = "gsk_";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummaryGenerator` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSummaryAdapter {
    /// `None` when no key is configured.
    client: Option<Client<OpenAIConfig>>,
    api_key: Option<String>,
    model: String,
    key_var: &'static str,
    key_prefix: Option<&'static str>,
}

impl OpenAiSummaryAdapter {
    fn build(
        api_key: Option<String>,
        model: String,
        base_url: String,
        key_var: &'static str,
        key_prefix: Option<&'static str>,
    ) -> Self {
        let client = api_key.as_ref().map(|key| {
            Client::with_config(
                OpenAIConfig::new()
                    .with_api_key(key.clone())
                    .with_api_base(base_url.clone()),
            )
        });
        Self {
            client,
            api_key,
            model,
            key_var,
            key_prefix,
        }
    }

    /// Creates an adapter for the OpenAI API.
    pub fn openai(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self::build(api_key, model, base_url, "OPENAI_API_KEY", None)
    }

    /// Creates an adapter for Groq's OpenAI-compatible endpoint.
    pub fn groq(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self::build(api_key, model, base_url, "GROQ_API_KEY", Some(GROQ_KEY_PREFIX))
    }

    fn check_key(&self) -> Result<&Client<OpenAIConfig>, ProviderError> {
        let (Some(client), Some(key)) = (self.client.as_ref(), self.api_key.as_deref()) else {
            return Err(ProviderError::MissingCredential(self.key_var.to_string()));
        };
        if let Some(prefix) = self.key_prefix {
            if !key.starts_with(prefix) {
                return Err(ProviderError::InvalidCredential(format!(
                    "{} must start with '{}'.",
                    self.key_var, prefix
                )));
            }
        }
        Ok(client)
    }
}

/// Maps an `async-openai` failure onto the provider error taxonomy.
fn translate_error(err: OpenAIError, key_var: &str) -> ProviderError {
    match err {
        OpenAIError::ApiError(api) => {
            let code = format!("{:?}", api.code).to_lowercase();
            let message = api.message.to_lowercase();
            if code.contains("invalid_api_key") || message.contains("api key") {
                ProviderError::InvalidCredential(format!(
                    "The provider rejected the key. Check {}.",
                    key_var
                ))
            } else {
                ProviderError::ProviderUnavailable(api.message)
            }
        }
        OpenAIError::Reqwest(e) => ProviderError::ProviderUnavailable(e.to_string()),
        OpenAIError::JSONDeserialize(e) => ProviderError::ProviderUnavailable(e.to_string()),
        other => ProviderError::Unknown(other.to_string()),
    }
}

//=========================================================================================
// `SummaryGenerator` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummaryGenerator for OpenAiSummaryAdapter {
    /// Sends the template and the case text as one user message.
    async fn generate(
        &self,
        text: &str,
        kind: SummaryKind,
        size: SummarySize,
    ) -> Result<String, ProviderError> {
        let client = self.check_key()?;

        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(build_prompt(kind, size, text))
            .build()
            .map_err(|e| ProviderError::Unknown(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(TEMPERATURE)
            .max_completion_tokens(MAX_COMPLETION_TOKENS)
            .n(1)
            .build()
            .map_err(|e| ProviderError::Unknown(e.to_string()))?;

        debug!("{} summary request to model={}", kind, self.model);

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = client.chat().create(request).await.map_err(|e| {
            error!("Chat completion failed: {}", e);
            translate_error(e, self.key_var)
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::ProviderUnavailable(
                "The completion contained no text content.".to_string(),
            ));
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::error::ApiError;

    const GROQ_BASE: &str = "https://api.groq.com/openai/v1";

    async fn generate(adapter: &OpenAiSummaryAdapter) -> Result<String, ProviderError> {
        adapter
            .generate("texto", SummaryKind::Simplified, SummarySize::Short)
            .await
    }

    #[tokio::test]
    async fn missing_key_names_the_variable() {
        let adapter = OpenAiSummaryAdapter::groq(None, "llama3-70b-8192".into(), GROQ_BASE.into());
        assert_eq!(
            generate(&adapter).await.unwrap_err(),
            ProviderError::MissingCredential("GROQ_API_KEY".to_string())
        );
    }

    #[tokio::test]
    async fn groq_key_without_prefix_is_rejected_locally() {
        let adapter = OpenAiSummaryAdapter::groq(
            Some("sk-not-groq".into()),
            "llama3-70b-8192".into(),
            GROQ_BASE.into(),
        );
        assert!(matches!(
            generate(&adapter).await.unwrap_err(),
            ProviderError::InvalidCredential(_)
        ));
    }

    #[test]
    fn openai_keys_have_no_prefix_rule() {
        let adapter = OpenAiSummaryAdapter::openai(
            Some("sk-anything".into()),
            "gpt-4o-mini".into(),
            "https://api.openai.com/v1".into(),
        );
        assert!(adapter.check_key().is_ok());
    }

    #[test]
    fn invalid_key_reply_maps_to_invalid_credential() {
        let err = OpenAIError::ApiError(ApiError {
            message: "Invalid API Key".to_string(),
            r#type: Some("invalid_request_error".to_string()),
            param: None,
            code: Some("invalid_api_key".into()),
        });
        assert!(matches!(
            translate_error(err, "GROQ_API_KEY"),
            ProviderError::InvalidCredential(_)
        ));
    }

    #[test]
    fn other_api_errors_mean_the_provider_is_unavailable() {
        let err = OpenAIError::ApiError(ApiError {
            message: "Rate limit reached".to_string(),
            r#type: None,
            param: None,
            code: None,
        });
        assert_eq!(
            translate_error(err, "OPENAI_API_KEY"),
            ProviderError::ProviderUnavailable("Rate limit reached".to_string())
        );
        assert!(matches!(
            translate_error(OpenAIError::InvalidArgument("bad".into()), "OPENAI_API_KEY"),
            ProviderError::Unknown(_)
        ));
    }
}
