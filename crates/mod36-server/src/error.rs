//! Error types for the Mod36 server

use mod36_core::{BackendError, FlowError};
use mod36_llm::LlmConfigError;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generation backend could not be created
    #[error("Backend error: {0}")]
    BackendError(#[from] BackendError),

    /// Flow catalog failed to build
    #[error("Flow error: {0}")]
    FlowError(#[from] FlowError),

    /// Listener or socket failure
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<LlmConfigError> for ServerError {
    fn from(err: LlmConfigError) -> Self {
        ServerError::ConfigError(err.to_string())
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;
