pub mod auth;
pub mod domain;
pub mod history;
pub mod intake;
pub mod markup;
pub mod pipeline;
pub mod ports;
pub mod prompts;
pub mod store;
pub mod summarize;

pub use domain::{
    AccessLevel, AuthSession, GenerationOptions, Summaries, SummaryEntry, SummaryKind,
    SummarySize, User, UserCredentials,
};
pub use ports::{
    CredentialHasher, DocumentTextExtractor, ExtractionError, KeyValueStore, PortError,
    PortResult, ProviderError, SummaryGenerator,
};
