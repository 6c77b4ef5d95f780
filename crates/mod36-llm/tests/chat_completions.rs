use std::sync::Arc;
use std::time::Duration;

use mod36_core::{BackendError, BackendRequest, ErrorKind, GenerationBackend, GenerationOptions};
use mod36_flows::{GenerateRealityInsightInput, Mod36Flows, PoeticizeTextInput};
use mod36_llm::{create_backend, ChatCompletionsBackend, LlmConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(prompt: &str) -> BackendRequest {
    BackendRequest {
        request_id: Default::default(),
        flow: "poeticizeText".to_string(),
        prompt: prompt.to_string(),
        output_schema: json!({
            "type": "object",
            "properties": { "poeticText": { "type": "string" } },
            "required": ["poeticText"]
        }),
        options: GenerationOptions {
            temperature: Some(0.7),
            max_output_tokens: None,
        },
    }
}

fn config_for(server: &MockServer) -> LlmConfig {
    LlmConfig {
        base_url: format!("{}/v1", server.uri()),
        api_key: Some("sk-test".to_string()),
        model: "test-model".to_string(),
        timeout_secs: 5,
        strict_schema: false,
    }
}

fn completion(content: Value) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_generate_returns_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [{ "role": "user", "content": "Hello" }],
            "temperature": 0.7,
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": "poeticizeText", "strict": false }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(json!("{\"poeticText\":\"O hello\"}"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = ChatCompletionsBackend::new(config_for(&server)).unwrap();
    let response = backend.generate(request("Hello")).await.unwrap();

    assert!(response.payload.is_none());
    assert_eq!(response.text.as_deref(), Some("{\"poeticText\":\"O hello\"}"));
}

#[tokio::test]
async fn test_missing_api_key_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("{}"))))
        .expect(1)
        .mount(&server)
        .await;

    let config = LlmConfig {
        api_key: None,
        ..config_for(&server)
    };
    let backend = ChatCompletionsBackend::new(config).unwrap();
    let response = backend.generate(request("Hello")).await.unwrap();

    assert_eq!(response.text.as_deref(), Some("{}"));
}

#[tokio::test]
async fn test_non_success_status_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let backend = ChatCompletionsBackend::new(config_for(&server)).unwrap();
    let err = backend.generate(request("Hello")).await.unwrap_err();

    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_envelope_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let backend = ChatCompletionsBackend::new(config_for(&server)).unwrap();
    let err = backend.generate(request("Hello")).await.unwrap_err();

    assert!(matches!(err, BackendError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(json!("{}")))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = LlmConfig {
        timeout_secs: 1,
        ..config_for(&server)
    };
    let backend = ChatCompletionsBackend::new(config).unwrap();
    let err = backend.generate(request("Hello")).await.unwrap_err();

    assert!(matches!(err, BackendError::Timeout(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let config = LlmConfig {
        base_url: "http://127.0.0.1:1/v1".to_string(),
        timeout_secs: 2,
        ..LlmConfig::default()
    };
    let backend = ChatCompletionsBackend::new(config).unwrap();
    let err = backend.generate(request("Hello")).await.unwrap_err();

    assert!(matches!(
        err,
        BackendError::Transport(_) | BackendError::Timeout(_)
    ));
}

#[tokio::test]
async fn test_poeticize_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(json!("{\"poeticText\":\"Hail, world unfurled\"}"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let flows = Mod36Flows::new(create_backend(config_for(&server)).unwrap()).unwrap();
    let output = flows
        .poeticize_text(&PoeticizeTextInput::new("Hello world"))
        .await
        .unwrap();

    assert_eq!(output.poetic_text, "Hail, world unfurled");

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.ends_with("Original Text: Hello world"));
    assert_eq!(body["response_format"]["json_schema"]["name"], "poeticizeText");
}

#[tokio::test]
async fn test_empty_choices_surface_as_invalid_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let flows = Mod36Flows::new(create_backend(config_for(&server)).unwrap()).unwrap();
    let err = flows
        .generate_reality_insight(&GenerateRealityInsightInput::new(["Housing", "Climate"]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyOrInvalidOutput);
}

#[tokio::test]
async fn test_refusal_surfaces_as_invalid_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "role": "assistant", "content": null, "refusal": "I can't help with that." }
            }]
        })))
        .mount(&server)
        .await;

    let flows = Mod36Flows::new(create_backend(config_for(&server)).unwrap()).unwrap();
    let err = flows
        .poeticize_text(&PoeticizeTextInput::new("Hello world"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyOrInvalidOutput);
}

#[tokio::test]
async fn test_server_error_surfaces_as_backend_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let backend: Arc<dyn GenerationBackend> = create_backend(config_for(&server)).unwrap();
    let flows = Mod36Flows::new(backend).unwrap();
    let err = flows
        .poeticize_text(&PoeticizeTextInput::new("Hello world"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
}
