use std::time::Duration;

use async_trait::async_trait;
use mod36_core::{BackendError, BackendRequest, BackendResponse, GenerationBackend};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::LlmConfig;

/// Generation backend speaking the OpenAI chat-completions protocol.
///
/// Works against any compatible server (OpenAI, LM Studio, vLLM, Ollama's `/v1`).
#[derive(Debug, Clone)]
pub struct ChatCompletionsBackend {
    config: LlmConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl ChatCompletionsBackend {
    pub fn new(config: LlmConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Maps an HTTP error to a BackendError
    fn map_http_error(error: reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout(error.to_string())
        } else if error.is_connect() {
            BackendError::Transport(format!("Connection error: {}", error))
        } else {
            BackendError::Transport(format!("HTTP error: {}", error))
        }
    }
}

#[async_trait]
impl GenerationBackend for ChatCompletionsBackend {
    #[instrument(
        name = "llm.chat_completion",
        skip(self, request),
        fields(flow = %request.flow, request_id = %request.request_id, model = %self.config.model)
    )]
    async fn generate(&self, request: BackendRequest) -> Result<BackendResponse, BackendError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.options.temperature,
            max_tokens: request.options.max_output_tokens,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &request.flow,
                    schema: &request.output_schema,
                    strict: self.config.strict_schema,
                },
            },
        };

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(Self::map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| format!("HTTP error: {}", status));
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(e.to_string())
            } else {
                BackendError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        let Some(choice) = completion.choices.into_iter().next() else {
            warn!("Completion contained no choices");
            return Ok(BackendResponse::empty());
        };

        if let Some(refusal) = choice.message.refusal {
            warn!(%refusal, "Model refused the request");
            return Ok(BackendResponse::empty());
        }

        debug!(
            content_len = choice.message.content.as_ref().map(|c| c.len()).unwrap_or(0),
            "Completion received"
        );

        Ok(BackendResponse {
            payload: None,
            text: choice.message.content,
        })
    }
}
