//! GenerationBackend trait definition for text generation services

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::BackendError;

/// Per-flow sampling options forwarded to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// One rendered prompt on its way to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct BackendRequest {
    pub request_id: Uuid,
    /// Name of the flow the prompt belongs to
    pub flow: String,
    pub prompt: String,
    /// JSON schema the response payload is expected to satisfy
    pub output_schema: Value,
    pub options: GenerationOptions,
}

/// Whatever the backend produced. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendResponse {
    /// Structured output, when the backend parsed it already
    pub payload: Option<Value>,
    /// Raw completion text
    pub text: Option<String>,
}

impl BackendResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_payload(payload: Value) -> Self {
        Self {
            payload: Some(payload),
            text: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            payload: None,
            text: Some(text.into()),
        }
    }
}

/// Represents the interface to an opaque text-generation service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Sends one request and returns one response.
    ///
    /// Contract: a single request/response exchange. Transport, timeout and retry policy
    /// are the implementation's business; any failure to obtain a response is a `BackendError`.
    async fn generate(&self, request: BackendRequest) -> Result<BackendResponse, BackendError>;
}
