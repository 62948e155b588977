#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use service_core::config::{Config, Environment};
use std::collections::HashMap;
use web_gateway::config::GatewayConfig;
use web_gateway::startup::build_router;
use web_gateway::AppState;

pub fn gateway_config(pairs: &[(&str, &str)]) -> GatewayConfig {
    let mut vars: HashMap<String, String> = HashMap::from([(
        "STATIC_DIR".to_string(),
        concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string(),
    )]);
    for (k, v) in pairs {
        vars.insert(k.to_string(), v.to_string());
    }

    let common = Config {
        port: 0,
        environment: Environment::Dev,
        log_level: "error".to_string(),
        otlp_endpoint: None,
    };
    GatewayConfig::from_lookup(common, &|key: &str| vars.get(key).cloned())
        .expect("Failed to build gateway config")
}

pub fn router(pairs: &[(&str, &str)]) -> axum::Router {
    build_router(AppState::new(gateway_config(pairs)).expect("Failed to build state"))
}

pub fn post_ask(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn json_body(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
