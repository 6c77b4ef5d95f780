//! Executes one flow end to end: validate input, render, generate, validate output

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument, Span};
use uuid::Uuid;

use crate::backend::{BackendRequest, BackendResponse, GenerationBackend};
use crate::error::FlowError;
use crate::flow::FlowDefinition;
use crate::schema::summarize;

/// Runs flows against a shared backend.
///
/// Holds no per-call state; concurrent `run` calls do not interact.
#[derive(Clone)]
pub struct FlowRunner {
    backend: Arc<dyn GenerationBackend>,
}

impl FlowRunner {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Validate `input` against the flow's input schema and render the prompt.
    ///
    /// This is the precondition half of `run`; it never touches the backend.
    pub fn prepare<I, O>(&self, flow: &FlowDefinition<I, O>, input: &I) -> Result<String, FlowError>
    where
        I: Serialize,
    {
        let value = serde_json::to_value(input)
            .map_err(|e| FlowError::invalid_input(flow.name(), e.to_string(), Vec::new()))?;

        if let Err(violations) = flow.input_schema().validate(&value) {
            // The first violation carries the most specific (often custom) message
            let message = violations
                .first()
                .map(|v| v.message.clone())
                .unwrap_or_else(|| summarize(&violations));
            return Err(FlowError::invalid_input(flow.name(), message, violations));
        }

        flow.template()
            .render(&value)
            .map_err(|message| FlowError::Template {
                flow: flow.name().to_string(),
                message,
            })
    }

    /// Execute `flow` once.
    ///
    /// Fails with `InvalidInput` before any backend call, `BackendUnavailable` when the backend
    /// errors, and `EmptyOrInvalidOutput` when the response is missing or fails the output schema.
    #[instrument(
        name = "flow.run",
        skip(self, flow, input),
        fields(flow = %flow.name(), request_id = tracing::field::Empty)
    )]
    pub async fn run<I, O>(&self, flow: &FlowDefinition<I, O>, input: &I) -> Result<O, FlowError>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let prompt = self.prepare(flow, input)?;

        let request_id = Uuid::new_v4();
        Span::current().record("request_id", tracing::field::display(request_id));
        debug!(prompt_len = prompt.len(), "Sending rendered prompt to generation backend");

        let request = BackendRequest {
            request_id,
            flow: flow.name().to_string(),
            prompt,
            output_schema: flow.output_schema().raw().clone(),
            options: flow.options().clone(),
        };

        let response = self.backend.generate(request).await.map_err(|source| {
            error!(error = %source, "Generation backend failed");
            FlowError::BackendUnavailable {
                flow: flow.name().to_string(),
                source,
            }
        })?;

        let payload = extract_payload(flow.name(), response)?;

        if let Err(violations) = flow.output_schema().validate(&payload) {
            let message = summarize(&violations);
            error!(%message, "Backend output failed output schema");
            return Err(FlowError::invalid_output(flow.name(), message));
        }

        serde_json::from_value(payload)
            .map_err(|e| FlowError::invalid_output(flow.name(), e.to_string()))
    }
}

impl std::fmt::Debug for FlowRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowRunner").finish_non_exhaustive()
    }
}

/// Pick the structured payload out of a backend response.
///
/// A structured payload wins; otherwise the text is parsed as JSON, tolerating a Markdown code fence.
fn extract_payload(flow: &str, response: BackendResponse) -> Result<Value, FlowError> {
    if let Some(payload) = response.payload {
        if !payload.is_null() {
            return Ok(payload);
        }
    }

    let text = response
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| FlowError::invalid_output(flow, "backend returned no payload"))?;

    serde_json::from_str(strip_code_fence(&text))
        .map_err(|e| FlowError::invalid_output(flow, format!("payload is not valid JSON: {}", e)))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackendError, ErrorKind};
    use crate::test_utils::StubBackend;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct EchoInput {
        text: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct EchoOutput {
        echoed: String,
    }

    fn echo_flow() -> FlowDefinition<EchoInput, EchoOutput> {
        FlowDefinition::new(
            "echo",
            json!({
                "type": "object",
                "required": ["text"],
                "properties": { "text": { "type": "string", "minLength": 1 } }
            }),
            json!({
                "type": "object",
                "required": ["echoed"],
                "properties": { "echoed": { "type": "string", "minLength": 1 } }
            }),
            "Echo: {{{text}}}",
        )
        .unwrap()
    }

    fn input(text: &str) -> EchoInput {
        EchoInput { text: text.to_string() }
    }

    #[tokio::test]
    async fn test_structured_payload_success() {
        let backend = Arc::new(StubBackend::new());
        backend.push_payload(json!({ "echoed": "hi" }));
        let runner = FlowRunner::new(backend.clone());

        let output = runner.run(&echo_flow(), &input("hi")).await.unwrap();

        assert_eq!(output, EchoOutput { echoed: "hi".into() });
        assert_eq!(backend.call_count(), 1);
        let request = backend.last_request().unwrap();
        assert_eq!(request.prompt, "Echo: hi");
        assert_eq!(request.flow, "echo");
        assert_eq!(request.output_schema["required"], json!(["echoed"]));
    }

    #[tokio::test]
    async fn test_text_payload_in_code_fence() {
        let backend = Arc::new(StubBackend::new());
        backend.push_text("```json\n{\"echoed\": \"fenced\"}\n```");
        let runner = FlowRunner::new(backend);

        let output = runner.run(&echo_flow(), &input("x")).await.unwrap();
        assert_eq!(output.echoed, "fenced");
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_backend_call() {
        let backend = Arc::new(StubBackend::new());
        let runner = FlowRunner::new(backend.clone());

        let err = runner.run(&echo_flow(), &input("")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_response_is_invalid_output() {
        let backend = Arc::new(StubBackend::new());
        backend.push_response(BackendResponse::empty());
        let runner = FlowRunner::new(backend);

        let err = runner.run(&echo_flow(), &input("x")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyOrInvalidOutput);
    }

    #[tokio::test]
    async fn test_null_payload_falls_back_to_text() {
        let backend = Arc::new(StubBackend::new());
        backend.push_response(BackendResponse {
            payload: Some(Value::Null),
            text: Some("{\"echoed\": \"from text\"}".into()),
        });
        let runner = FlowRunner::new(backend);

        let output = runner.run(&echo_flow(), &input("x")).await.unwrap();
        assert_eq!(output.echoed, "from text");
    }

    #[tokio::test]
    async fn test_non_json_text_is_invalid_output() {
        let backend = Arc::new(StubBackend::new());
        backend.push_text("Sure! Here is your echo: x");
        let runner = FlowRunner::new(backend);

        let err = runner.run(&echo_flow(), &input("x")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyOrInvalidOutput);
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_schema_violation_is_invalid_output() {
        let backend = Arc::new(StubBackend::new());
        backend.push_payload(json!({ "echoed": "" }));
        let runner = FlowRunner::new(backend);

        let err = runner.run(&echo_flow(), &input("x")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyOrInvalidOutput);
    }

    #[tokio::test]
    async fn test_backend_error_is_propagated_unmasked() {
        let backend = Arc::new(StubBackend::new());
        backend.push_error(BackendError::Timeout("30s elapsed".into()));
        let runner = FlowRunner::new(backend);

        let err = runner.run(&echo_flow(), &input("x")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
        match err {
            FlowError::BackendUnavailable { source: BackendError::Timeout(msg), .. } => {
                assert_eq!(msg, "30s elapsed")
            }
            other => panic!("Expected BackendUnavailable(Timeout), got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_renders_without_backend() {
        let backend = Arc::new(StubBackend::new());
        let runner = FlowRunner::new(backend.clone());
        let prompt = runner.prepare(&echo_flow(), &input("dry run")).unwrap();
        assert_eq!(prompt, "Echo: dry run");
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  ```json\n{\"a\":1}\n```  "), "{\"a\":1}");
    }
}
