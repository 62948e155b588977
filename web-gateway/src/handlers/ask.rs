use crate::AppState;
use axum::{extract::State, Extension, Json};
use service_core::error::AppError;
use service_core::middleware::RequestId;
use service_core::prompt::{Prompt, TextReply};

/// `POST /api/ask`: validate locally, then forward to the relay.
pub async fn ask(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    prompt: Prompt,
) -> Result<Json<TextReply>, AppError> {
    let request_id = request_id.map(|Extension(RequestId(id))| id);
    let text = state.relay.ask(&prompt, request_id.as_deref()).await?;
    Ok(Json(TextReply { text }))
}
