use crate::services::completion;
use crate::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::prompt::{Prompt, TextReply};

/// `POST /api/claude`: one provider call for a validated prompt.
pub async fn claude(
    State(state): State<AppState>,
    prompt: Prompt,
) -> Result<Json<TextReply>, AppError> {
    let text = completion::complete(state.provider.as_ref(), &prompt).await?;
    Ok(Json(TextReply { text }))
}
