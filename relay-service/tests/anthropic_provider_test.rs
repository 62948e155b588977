//! Anthropic client against a mocked Messages API.

mod common;

use common::{test_config, TEST_ANTHROPIC_KEY};
use relay_service::config::RelayAuth;
use relay_service::services::providers::anthropic::AnthropicProvider;
use relay_service::services::{CompletionProvider, ProviderError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> AnthropicProvider {
    let config = test_config(RelayAuth::Platform, &server.uri());
    AnthropicProvider::new(&config.anthropic).unwrap()
}

#[tokio::test]
async fn sends_a_single_user_turn_and_returns_the_first_text_block() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", TEST_ANTHROPIC_KEY))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_json(json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 800,
            "messages": [{ "role": "user", "content": "Say hi" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "Claude says hi" },
                { "type": "text", "text": "ignored" }
            ],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = provider_for(&server).complete("Say hi").await.unwrap();
    assert_eq!(text, "Claude says hi");
}

#[tokio::test]
async fn empty_content_is_an_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .mount(&server)
        .await;

    let text = provider_for(&server).complete("Say hi").await.unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn error_envelope_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "15")
                .set_body_json(json!({
                    "type": "error",
                    "error": { "type": "rate_limit_error", "message": "Slow down" }
                })),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server).complete("Say hi").await.unwrap_err();
    match err {
        ProviderError::Api {
            status,
            error_type,
            message,
            retry_after,
        } => {
            assert_eq!(status, 429);
            assert_eq!(error_type.as_deref(), Some("rate_limit_error"));
            assert_eq!(message, "Slow down");
            assert_eq!(retry_after, Some(15));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_keeps_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream connect error"))
        .mount(&server)
        .await;

    let err = provider_for(&server).complete("Say hi").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn unreachable_provider_is_a_network_error() {
    let config = test_config(RelayAuth::Platform, "http://127.0.0.1:1");
    let provider = AnthropicProvider::new(&config.anthropic).unwrap();

    let err = provider.complete("Say hi").await.unwrap_err();
    assert!(matches!(err, ProviderError::NetworkError(_)));
}
