//! Configuration for the chat-completions backend
//!
//! Loaded from environment variables (after `.env`), falling back to defaults.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const ENV_BASE_URL: &str = "MOD36_LLM_BASE_URL";
pub const ENV_API_KEY: &str = "MOD36_LLM_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "MOD36_LLM_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "MOD36_LLM_TIMEOUT_SECS";
pub const ENV_STRICT_SCHEMA: &str = "MOD36_LLM_STRICT_SCHEMA";

#[derive(Error, Debug)]
pub enum LlmConfigError {
    #[error("Invalid base URL '{0}': expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    #[error("Model name must not be empty")]
    EmptyModel,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API root, e.g. `https://api.openai.com/v1`; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token; omitted for local servers that need none
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Ask the provider to enforce the output schema strictly
    #[serde(default)]
    pub strict_schema: bool,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            strict_schema: false,
        }
    }
}

impl LlmConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, LlmConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unparsable numbers are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }

        config.api_key = lookup(ENV_API_KEY)
            .or_else(|| lookup(ENV_OPENAI_API_KEY))
            .filter(|key| !key.trim().is_empty());

        if let Some(model) = lookup(ENV_MODEL) {
            config.model = model;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => warn!("Invalid {} value: {}", ENV_TIMEOUT_SECS, timeout),
            }
        }

        if let Some(strict) = lookup(ENV_STRICT_SCHEMA) {
            config.strict_schema = strict.eq_ignore_ascii_case("true") || strict == "1";
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LlmConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(LlmConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.model.trim().is_empty() {
            return Err(LlmConfigError::EmptyModel);
        }
        Ok(())
    }
}

/// Keeps the API key out of logs
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("strict_schema", &self.strict_schema)
            .finish()
    }
}
