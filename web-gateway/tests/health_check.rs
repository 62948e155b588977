mod common;

use axum::http::StatusCode;
use common::{body_bytes, get, json_body, router};
use serde_json::json;
use tower::ServiceExt;

const RELAY: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn health_check_returns_ok() {
    let response = router(&[("API_CLAUDE_URL", RELAY)])
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("content-security-policy"));
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn serves_the_ui() {
    let response = router(&[("API_CLAUDE_URL", RELAY)])
        .oneshot(get("/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("/api/ask") || html.contains("app.js"));
}

#[tokio::test]
async fn unknown_paths_are_json_404s() {
    let response = router(&[("API_CLAUDE_URL", RELAY)])
        .oneshot(get("/nope.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Not Found");
    assert_eq!(json["message"], "Route GET /nope.txt not found");
}
