//! crates/juris_resumo_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like storage or LLM APIs.

use async_trait::async_trait;
use crate::domain::{SummaryKind, SummarySize};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for storage-like port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Failures surfaced by an LLM provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// No API key/token is configured for the selected provider.
    #[error("Missing provider credential: {0}")]
    MissingCredential(String),
    /// The provider rejected the configured key.
    #[error("Invalid provider credential: {0}")]
    InvalidCredential(String),
    /// Non-2xx status, transport failure, or a malformed/empty response body.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("Unknown provider error: {0}")]
    Unknown(String),
}

/// Failures while turning an uploaded document into text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Unsupported file type '{0}'. Please upload a PDF or DOCX file.")]
    UnsupportedType(String),
    #[error("Failed to extract text: {0}")]
    Extraction(String),
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// String-keyed, string-valued persistent storage. Writes are last-write-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> PortResult<()>;

    async fn remove(&self, key: &str) -> PortResult<()>;
}

/// One-way password hashing.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> PortResult<String>;

    /// Returns `false` for a wrong password and for an unparseable hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Generates one summary of `text` using the template for `kind`.
    async fn generate(
        &self,
        text: &str,
        kind: SummaryKind,
        size: SummarySize,
    ) -> Result<String, ProviderError>;
}

/// Converts an uploaded binary document into plain text. CPU-bound; callers on an
/// async runtime should run it on a blocking thread.
pub trait DocumentTextExtractor: Send + Sync {
    fn extract_text(&self, mime_type: &str, bytes: &[u8]) -> Result<String, ExtractionError>;
}
