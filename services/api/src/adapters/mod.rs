pub mod export;
pub mod extractor;
pub mod gemini_llm;
pub mod hasher;
pub mod openai_llm;
pub mod store;

pub use extractor::FileParser;
pub use gemini_llm::GeminiSummaryAdapter;
pub use hasher::Argon2Hasher;
pub use openai_llm::OpenAiSummaryAdapter;
pub use store::SqliteKvStore;

use crate::config::{Config, LlmProvider};
use juris_resumo_core::ports::SummaryGenerator;
use std::sync::Arc;

/// Builds the generator for the configured `LLM_PROVIDER`.
pub fn summary_generator(config: &Config) -> Arc<dyn SummaryGenerator> {
    let model = config.summary_model.clone();
    let base_url = config.llm_base_url.clone();
    let api_key = config.provider_api_key();
    match config.llm_provider {
        LlmProvider::Gemini => Arc::new(GeminiSummaryAdapter::new(api_key, model, base_url)),
        LlmProvider::Groq => Arc::new(OpenAiSummaryAdapter::groq(api_key, model, base_url)),
        LlmProvider::OpenAi => Arc::new(OpenAiSummaryAdapter::openai(api_key, model, base_url)),
    }
}
