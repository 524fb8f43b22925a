//! Integration tests for `OpenAiClient` using wiremock HTTP mocks.

use koreanow_openai::{ChatMessage, CompletionApi, CompletionRequest, OpenAiClient, OpenAiError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OpenAiClient {
    OpenAiClient::with_base_url("test-key", base_url).expect("client construction should not fail")
}

fn request() -> CompletionRequest {
    CompletionRequest {
        model: "gpt-4o-mini".to_owned(),
        messages: vec![ChatMessage::new("user", "안녕하세요")],
        temperature: 0.9,
        max_tokens: 300,
    }
}

#[tokio::test]
async fn complete_returns_parsed_response() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "반갑습니다"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 4, "total_tokens": 13}
    });

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "안녕하세요"}],
            "temperature": 0.9,
            "max_tokens": 300
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/v1", server.uri()));
    let response = client.complete(&request()).await.expect("should succeed");

    assert_eq!(response.choices.len(), 1);
    assert_eq!(response.choices[0].message.role, "assistant");
    assert_eq!(response.choices[0].message.content, "반갑습니다");
    assert_eq!(response.usage.prompt_tokens, 9);
    assert_eq!(response.usage.completion_tokens, 4);
    assert_eq!(response.usage.total_tokens, 13);
}

#[tokio::test]
async fn non_success_status_carries_upstream_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete(&request())
        .await
        .expect_err("401 should fail");

    match err {
        OpenAiError::UpstreamStatus { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected UpstreamStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [],
            "usage": {"prompt_tokens": 1, "completion_tokens": 0, "total_tokens": 1}
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete(&request())
        .await
        .expect_err("no choices should fail");
    assert!(matches!(err, OpenAiError::EmptyChoices), "got: {err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete(&request())
        .await
        .expect_err("non-JSON should fail");
    assert!(matches!(err, OpenAiError::Deserialize { .. }), "got: {err:?}");
}
