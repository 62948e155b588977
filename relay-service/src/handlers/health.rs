use axum::Json;
use serde_json::{json, Value};

/// `GET /` service descriptor.
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "relay-service",
        "ok": true,
        "version": env!("CARGO_PKG_VERSION"),
        "routes": {
            "health": "GET /health",
            "claude": "POST /api/claude  { \"prompt\": \"...\" }",
        },
    }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
