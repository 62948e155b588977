//! Completion provider abstraction.
//!
//! The handler only sees [`CompletionProvider`]; the Anthropic client and the
//! scripted mock are interchangeable behind it.

pub mod anthropic;
pub mod mock;

use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The provider answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        error_type: Option<String>,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn error_type(&self) -> Option<&str> {
        match self {
            ProviderError::Api { error_type, .. } => error_type.as_deref(),
            ProviderError::NotConfigured(_) => Some("not_configured"),
            ProviderError::NetworkError(_) => Some("network_error"),
            ProviderError::InvalidResponse(_) => Some("invalid_response"),
        }
    }
}

/// Trait for single-turn text completion providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send `prompt` as the only user turn and return the first text block,
    /// or an empty string when the provider returns no content.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Replace the credential used for subsequent calls. Returns whether the
    /// key actually changed.
    fn reconfigure(&self, api_key: Secret<String>) -> Result<bool, ProviderError>;
}
