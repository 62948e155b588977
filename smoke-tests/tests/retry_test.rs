//! Retry behaviour of the smoke runner against a scripted gateway.

use serde_json::json;
use smoke_tests::{SmokeConfig, SmokeError, SmokeRunner};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config(base_url: &str) -> SmokeConfig {
    let mut config = SmokeConfig::new(base_url);
    config.retry_delay = Duration::from_millis(10);
    config.request_timeout = Duration::from_secs(2);
    config
}

async fn healthy_gateway(reply: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(wiremock::matchers::body_json(json!({})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Bad Request",
            "message": "Body must include: { \"prompt\": \"...\" }"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": reply })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn passes_against_a_healthy_gateway() {
    let server = healthy_gateway("smoke test passed").await;
    let runner = SmokeRunner::new(fast_config(&server.uri())).unwrap();

    let report = runner.run().await.unwrap();
    assert_eq!(report.passed, 3);
    assert_eq!(report.reply, "smoke test passed");
}

#[tokio::test]
async fn http_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let runner = SmokeRunner::new(fast_config(&server.uri())).unwrap();
    let err = runner.check_health().await.unwrap_err();

    assert!(matches!(
        err,
        SmokeError::UnexpectedStatus { actual, .. } if actual.as_u16() == 503
    ));
}

#[tokio::test]
async fn transport_errors_exhaust_the_attempts() {
    let runner = SmokeRunner::new(fast_config("http://127.0.0.1:1")).unwrap();
    let err = runner.check_health().await.unwrap_err();

    match err {
        SmokeError::Transport { attempts, url, .. } => {
            assert_eq!(attempts, 3);
            assert_eq!(url, "http://127.0.0.1:1/health");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_reply_fails_the_prompt_check() {
    let server = healthy_gateway("").await;
    let runner = SmokeRunner::new(fast_config(&server.uri())).unwrap();

    let err = runner.run().await.unwrap_err();
    assert!(err.to_string().contains("Response missing text"));
}

#[tokio::test]
async fn wrong_health_body_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "degraded" })))
        .mount(&server)
        .await;

    let runner = SmokeRunner::new(fast_config(&server.uri())).unwrap();
    assert!(matches!(
        runner.check_health().await,
        Err(SmokeError::UnexpectedBody { .. })
    ));
}
