#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use relay_service::config::{AnthropicConfig, RelayAuth, RelayConfig};
use relay_service::services::CompletionProvider;
use relay_service::AppState;
use secrecy::Secret;
use serde_json::Value;
use service_core::config::{Config, Environment, RateLimitConfig};
use std::sync::Arc;

pub const TEST_ANTHROPIC_KEY: &str = "sk-ant-REDACTED";
pub const TEST_SERVICE_KEY: &str = "relay-shared-secret";

pub fn test_config(auth: RelayAuth, base_url: &str) -> RelayConfig {
    RelayConfig {
        common: Config {
            port: 0,
            environment: Environment::Dev,
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
        anthropic: AnthropicConfig {
            api_key: Secret::new(TEST_ANTHROPIC_KEY.to_string()),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 800,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds: 5,
        },
        auth,
        rate_limit: RateLimitConfig::default(),
    }
}

pub fn shared_key() -> RelayAuth {
    RelayAuth::SharedKey(Secret::new(TEST_SERVICE_KEY.to_string()))
}

pub fn test_state(auth: RelayAuth, provider: Arc<dyn CompletionProvider>) -> AppState {
    AppState::new(test_config(auth, "http://127.0.0.1:1"), provider)
}

pub fn post_claude(body: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/claude")
        .header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
