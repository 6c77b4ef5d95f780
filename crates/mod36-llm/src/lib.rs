//! HTTP generation backend for Mod36 flows

use std::sync::Arc;

use mod36_core::{BackendError, GenerationBackend};

pub mod client;
pub mod config;

pub use client::ChatCompletionsBackend;
pub use config::{LlmConfig, LlmConfigError};

/// Creates the generation backend described by `config`.
pub fn create_backend(config: LlmConfig) -> Result<Arc<dyn GenerationBackend>, BackendError> {
    if config.api_key.is_none() {
        tracing::warn!(base_url = %config.base_url, "No API key configured for generation backend");
    }
    Ok(Arc::new(ChatCompletionsBackend::new(config)?))
}
