//! Connection configuration for the remote agent service.

use crate::error::{KaiwaError, Result};

const DEFAULT_API_VERSION: &str = "2024-12-01-preview";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Settings identifying the remote agent-service project.
///
/// Loaded once at startup; a missing endpoint or key is fatal
/// (`KaiwaError::Configuration`), never discovered lazily mid-session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project endpoint, e.g. `https://myproject.services.example.com/api`.
    pub endpoint: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// REST API version appended to every request.
    pub api_version: String,
    /// Model identifier baked into every created agent.
    pub model: String,
}

impl Config {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Load from environment variables (reads `.env` if present).
    ///
    /// `KAIWA_PROJECT_ENDPOINT` and `KAIWA_API_KEY` are required;
    /// `KAIWA_API_VERSION` and `KAIWA_MODEL` override the defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let endpoint = std::env::var("KAIWA_PROJECT_ENDPOINT").map_err(|_| {
            KaiwaError::Configuration(
                "KAIWA_PROJECT_ENDPOINT is not set; it must point at the agent-service project"
                    .to_string(),
            )
        })?;
        let api_key = std::env::var("KAIWA_API_KEY").map_err(|_| {
            KaiwaError::Configuration("KAIWA_API_KEY is not set".to_string())
        })?;

        let mut config = Self::new(endpoint, api_key);
        if let Ok(version) = std::env::var("KAIWA_API_VERSION") {
            config.api_version = version;
        }
        if let Ok(model) = std::env::var("KAIWA_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Override the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
