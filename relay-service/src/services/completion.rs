//! One provider call per prompt, with provider failures translated into
//! caller-facing statuses.

use crate::services::providers::{CompletionProvider, ProviderError};
use service_core::error::AppError;
use service_core::prompt::Prompt;

pub async fn complete(provider: &dyn CompletionProvider, prompt: &Prompt) -> Result<String, AppError> {
    provider
        .complete(prompt.as_str())
        .await
        .map_err(map_provider_error)
}

/// Translate a provider failure. Every failure is logged with its status and
/// type before it propagates.
pub fn map_provider_error(err: ProviderError) -> AppError {
    let status = err.status();
    let error_type = err.error_type().unwrap_or("N/A").to_string();

    tracing::error!(
        status = %status.map(|s| s.to_string()).unwrap_or_else(|| "N/A".to_string()),
        error_type = %error_type,
        "Claude API error"
    );

    match err {
        ProviderError::Api {
            status: 401,
            ..
        } => {
            tracing::error!("Authentication failed, check ANTHROPIC_API_KEY");
            AppError::Unauthorized(
                "Claude auth failed (401). Your API key is invalid or revoked.".to_string(),
            )
        }
        ProviderError::Api {
            status: 403,
            ..
        } => {
            tracing::error!("Forbidden, key may lack required permissions");
            AppError::Forbidden(
                "Claude forbidden (403). Your API key may lack permissions for this model."
                    .to_string(),
            )
        }
        ProviderError::Api {
            status: 429,
            retry_after,
            ..
        } => {
            tracing::error!("Rate limited, too many requests or quota exceeded");
            AppError::TooManyRequests(
                "Rate limited (429). Slow down or check your plan/quota.".to_string(),
                retry_after,
            )
        }
        ProviderError::Api {
            status: 400,
            message,
            ..
        } => {
            tracing::error!(message = %message, "Bad request");
            AppError::BadRequest(format!("Claude request invalid (400): {}", message))
        }
        ProviderError::Api {
            status, message, ..
        } if status >= 500 => {
            tracing::error!(message = %message, "Provider server error");
            AppError::BadGateway(format!("Claude server error ({}). Try again later.", status))
        }
        ProviderError::Api {
            status, message, ..
        } => {
            tracing::error!(message = %message, "Unexpected provider status");
            AppError::InternalError(anyhow::anyhow!(
                "Claude request failed ({}): {}",
                status,
                message
            ))
        }
        ProviderError::NetworkError(message) | ProviderError::InvalidResponse(message) => {
            tracing::error!(message = %message, "Provider unreachable");
            AppError::BadGateway("Failed to reach Claude. Try again later.".to_string())
        }
        ProviderError::NotConfigured(message) => AppError::InternalError(anyhow::anyhow!(
            "Claude request failed: {}",
            message
        )),
    }
}
