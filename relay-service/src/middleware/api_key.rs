use crate::config::RelayAuth;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Pure function of the configured mode and the presented header.
pub fn is_authorized(auth: &RelayAuth, provided: Option<&str>) -> bool {
    match auth {
        RelayAuth::Platform => true,
        RelayAuth::SharedKey(expected) => provided.is_some_and(|provided| {
            provided
                .as_bytes()
                .ct_eq(expected.expose_secret().as_bytes())
                .into()
        }),
    }
}

/// Shared-secret gate for `POST /api/claude`; runs before the body is read.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if !is_authorized(&state.config.auth, provided) {
        tracing::warn!(
            header_present = provided.is_some(),
            "Rejected request with missing or invalid x-api-key"
        );
        return Err(AppError::Unauthorized("Missing or invalid x-api-key header".to_string()));
    }

    Ok(next.run(request).await)
}
