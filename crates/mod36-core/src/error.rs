//! Error types for prompt flows and generation backends

use thiserror::Error;

use crate::schema::SchemaViolation;

/// The failure classes a flow caller has to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input failed the flow's input schema. No backend call was made.
    InvalidInput,
    /// The backend answered, but with nothing usable or with a payload that fails the output schema.
    EmptyOrInvalidOutput,
    /// The backend could not be reached or refused the request.
    BackendUnavailable,
    /// A flow definition, template or bundled data set is broken.
    Definition,
}

/// Errors raised by a generation backend.
///
/// Backends own transport, timeout and retry policy; the runner forwards these unchanged.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend response could not be decoded: {0}")]
    InvalidResponse(String),

    #[error("Backend misconfigured: {0}")]
    Configuration(String),
}

/// Base error type for flow operations.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Invalid input for flow '{flow}': {message}")]
    InvalidInput {
        flow: String,
        message: String,
        violations: Vec<SchemaViolation>,
    },

    #[error("Flow '{flow}' produced empty or invalid output: {message}")]
    EmptyOrInvalidOutput { flow: String, message: String },

    #[error("Generation backend unavailable for flow '{flow}'")]
    BackendUnavailable {
        flow: String,
        #[source]
        source: BackendError,
    },

    #[error("Invalid schema for flow '{flow}': {message}")]
    Schema { flow: String, message: String },

    #[error("Template error in flow '{flow}': {message}")]
    Template { flow: String, message: String },

    #[error("Bundled data error: {0}")]
    Data(String),
}

impl FlowError {
    /// Helper to create an input validation error
    pub fn invalid_input(
        flow: impl Into<String>,
        message: impl Into<String>,
        violations: Vec<SchemaViolation>,
    ) -> Self {
        FlowError::InvalidInput {
            flow: flow.into(),
            message: message.into(),
            violations,
        }
    }

    /// Helper to create an output validation error
    pub fn invalid_output(flow: impl Into<String>, message: impl Into<String>) -> Self {
        FlowError::EmptyOrInvalidOutput {
            flow: flow.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::InvalidInput { .. } => ErrorKind::InvalidInput,
            FlowError::EmptyOrInvalidOutput { .. } => ErrorKind::EmptyOrInvalidOutput,
            FlowError::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
            FlowError::Schema { .. } | FlowError::Template { .. } | FlowError::Data(_) => {
                ErrorKind::Definition
            }
        }
    }

    /// The message meant for an end user, without the flow name prefix.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::InvalidInput { message, .. } => message.clone(),
            FlowError::EmptyOrInvalidOutput { .. } => {
                "The AI failed to generate a valid response.".to_string()
            }
            FlowError::BackendUnavailable { .. } => {
                "The generation service is unavailable. Please try again.".to_string()
            }
            _ => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}
