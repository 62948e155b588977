//! Gateway and relay running together, with the provider scripted.

use relay_service::config::{AnthropicConfig, RelayAuth, RelayConfig};
use relay_service::services::providers::mock::MockProvider;
use relay_service::services::CompletionProvider;
use secrecy::Secret;
use serde_json::json;
use service_core::config::{Config, Environment, RateLimitConfig};
use smoke_tests::{SmokeConfig, SmokeError, SmokeRunner};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use web_gateway::config::GatewayConfig;

const SHARED_KEY: &str = "e2e-shared-secret";

fn common() -> Config {
    Config {
        port: 0,
        environment: Environment::Dev,
        log_level: "error".to_string(),
        otlp_endpoint: None,
    }
}

async fn spawn_relay(provider: Arc<dyn CompletionProvider>) -> u16 {
    let config = RelayConfig {
        common: common(),
        anthropic: AnthropicConfig {
            api_key: Secret::new("sk-ant-REDACTED".to_string()),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 800,
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 5,
        },
        auth: RelayAuth::SharedKey(Secret::new(SHARED_KEY.to_string())),
        rate_limit: RateLimitConfig::default(),
    };

    let app = relay_service::startup::Application::build(config, provider)
        .await
        .expect("Failed to build relay");
    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });
    port
}

async fn spawn_gateway(relay_port: u16, service_key: &str) -> u16 {
    let vars = HashMap::from([
        (
            "API_CLAUDE_URL".to_string(),
            format!("http://127.0.0.1:{}", relay_port),
        ),
        ("API_SERVICE_KEY".to_string(), service_key.to_string()),
    ]);
    let config = GatewayConfig::from_lookup(common(), &|key: &str| vars.get(key).cloned())
        .expect("Failed to build gateway config");

    let app = web_gateway::startup::Application::build(config)
        .await
        .expect("Failed to build gateway");
    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });
    port
}

fn runner(gateway_port: u16) -> SmokeRunner {
    let mut config = SmokeConfig::new(&format!("http://127.0.0.1:{}", gateway_port));
    config.retry_delay = Duration::from_millis(50);
    SmokeRunner::new(config).unwrap()
}

#[tokio::test]
async fn smoke_run_passes_through_both_services() {
    let provider = Arc::new(MockProvider::replying("smoke test passed"));
    let relay_port = spawn_relay(provider.clone()).await;
    let gateway_port = spawn_gateway(relay_port, SHARED_KEY).await;

    let report = runner(gateway_port).run().await.unwrap();

    assert_eq!(report.reply, "smoke test passed");
    // The empty-body check is rejected at the gateway.
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn provider_rate_limit_reaches_the_browser() {
    let provider = Arc::new(MockProvider::failing_with_status(429, "rate limited"));
    let relay_port = spawn_relay(provider).await;
    let gateway_port = spawn_gateway(relay_port, SHARED_KEY).await;

    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/api/ask", gateway_port))
        .json(&json!({ "prompt": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 429);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Rate limited (429). Slow down or check your plan/quota."
    );
}

#[tokio::test]
async fn wrong_shared_key_fails_the_prompt_check() {
    let provider = Arc::new(MockProvider::replying("unused"));
    let relay_port = spawn_relay(provider.clone()).await;
    let gateway_port = spawn_gateway(relay_port, "not-the-key").await;

    let err = runner(gateway_port).run().await.unwrap_err();

    assert!(matches!(
        err,
        SmokeError::UnexpectedStatus { actual, .. } if actual.as_u16() == 401
    ));
    assert_eq!(provider.calls(), 0);
}
