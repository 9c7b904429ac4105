//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use juris_resumo_core::auth::AdminSeed;
use juris_resumo_core::summarize::FanOutPolicy;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// The LLM backend summaries are generated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    Groq,
    OpenAi,
}

impl LlmProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-2.5-flash",
            LlmProvider::Groq => "llama3-70b-8192",
            LlmProvider::OpenAi => "gpt-4o-mini",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com",
            LlmProvider::Groq => "https://api.groq.com/openai/v1",
            LlmProvider::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// The environment variable holding this provider's key.
    pub fn key_var(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::Groq => "GROQ_API_KEY",
            LlmProvider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "groq" => Ok(LlmProvider::Groq),
            "openai" => Ok(LlmProvider::OpenAi),
            other => Err(format!("'{other}' is not one of gemini, groq, openai")),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub cors_origin: String,
    pub llm_provider: LlmProvider,
    pub gemini_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub summary_model: String,
    pub llm_base_url: String,
    pub fan_out_policy: FanOutPolicy,
    pub admin: AdminSeed,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty value counts as unset.
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        // --- Load Server and Storage Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://juris_resumo.db?mode=rwc".to_string());

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Load LLM Settings (keys are optional until a summary is requested) ---
        let llm_provider = match var("LLM_PROVIDER") {
            Some(value) => value
                .parse::<LlmProvider>()
                .map_err(|e| ConfigError::InvalidValue("LLM_PROVIDER".to_string(), e))?,
            None => LlmProvider::Gemini,
        };
        let gemini_api_key = var("GEMINI_API_KEY");
        let groq_api_key = var("GROQ_API_KEY");
        let openai_api_key = var("OPENAI_API_KEY");

        let summary_model =
            var("SUMMARY_MODEL").unwrap_or_else(|| llm_provider.default_model().to_string());
        let llm_base_url = var("LLM_BASE_URL")
            .unwrap_or_else(|| llm_provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        let fan_out_policy = match var("FAN_OUT_POLICY") {
            Some(value) => value
                .parse::<FanOutPolicy>()
                .map_err(|e| ConfigError::InvalidValue("FAN_OUT_POLICY".to_string(), e))?,
            None => FanOutPolicy::default(),
        };

        // --- Load the Admin Seed ---
        let defaults = AdminSeed::default();
        let admin = AdminSeed {
            email: var("ADMIN_EMAIL").unwrap_or(defaults.email),
            password: var("ADMIN_PASSWORD").unwrap_or(defaults.password),
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            llm_provider,
            gemini_api_key,
            groq_api_key,
            openai_api_key,
            summary_model,
            llm_base_url,
            fan_out_policy,
            admin,
        })
    }

    /// The key configured for the selected provider, if any.
    pub fn provider_api_key(&self) -> Option<String> {
        match self.llm_provider {
            LlmProvider::Gemini => self.gemini_api_key.clone(),
            LlmProvider::Groq => self.groq_api_key.clone(),
            LlmProvider::OpenAi => self.openai_api_key.clone(),
        }
    }
}
