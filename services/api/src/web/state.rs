//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the identity attached to an
//! authenticated request.

use crate::config::Config;
use juris_resumo_core::{
    auth::AuthService,
    domain::User,
    history::{HistoryStore, LastGenerationCache},
    pipeline::SummaryPipeline,
    ports::{CredentialHasher, DocumentTextExtractor, KeyValueStore, SummaryGenerator},
    store::JsonStore,
    summarize::SummarizationClient,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthService>,
    pub pipeline: Arc<SummaryPipeline>,
    pub history: Arc<HistoryStore>,
    pub last_generation: Arc<LastGenerationCache>,
    pub extractor: Arc<dyn DocumentTextExtractor>,
}

impl AppState {
    /// Wires the core services over one key-value store.
    pub fn new(
        config: Arc<Config>,
        kv: Arc<dyn KeyValueStore>,
        hasher: Arc<dyn CredentialHasher>,
        generator: Arc<dyn SummaryGenerator>,
        extractor: Arc<dyn DocumentTextExtractor>,
    ) -> Self {
        let store = JsonStore::new(kv);
        let auth = Arc::new(AuthService::new(
            store.clone(),
            hasher,
            config.admin.clone(),
        ));
        let history = Arc::new(HistoryStore::new(store.clone()));
        let last_generation = Arc::new(LastGenerationCache::new(store));
        let client = SummarizationClient::new(generator, config.fan_out_policy);
        let pipeline = Arc::new(SummaryPipeline::new(
            client,
            history.clone(),
            last_generation.clone(),
        ));

        Self {
            config,
            auth,
            pipeline,
            history,
            last_generation,
            extractor,
        }
    }
}

//=========================================================================================
// CurrentUser (Inserted by the Auth Middleware)
//=========================================================================================

/// The session behind a request, as resolved by `require_auth`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub token: String,
    pub user: User,
}
