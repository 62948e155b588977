//! Anthropic Messages API provider.

use super::{CompletionProvider, ProviderError};
use crate::config::{validate_api_key, AnthropicConfig};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider client built once at startup. The key sits behind a lock so a
/// rotation swaps it without rebuilding the HTTP client.
pub struct AnthropicProvider {
    client: Client,
    api_key: RwLock<Secret<String>>,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(config: &AnthropicConfig) -> Result<Self, ProviderError> {
        validate_api_key(config.api_key.expose_secret())
            .map_err(|reason| ProviderError::NotConfigured(reason.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: RwLock::new(config.api_key.clone()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: config.base_url.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn current_key(&self) -> Secret<String> {
        self.api_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending request to Anthropic API"
        );

        let api_key = self.current_key();
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            let envelope = serde_json::from_str::<ErrorEnvelope>(&body).ok();

            let error_type = envelope.as_ref().and_then(|e| e.error.kind.clone());
            let message = envelope
                .and_then(|e| e.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    if body.is_empty() {
                        status.canonical_reason().unwrap_or("Unknown error").to_string()
                    } else {
                        body
                    }
                });

            return Err(ProviderError::Api {
                status: status.as_u16(),
                error_type,
                message,
                retry_after,
            });
        }

        let api_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(api_response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .unwrap_or_default())
    }

    fn reconfigure(&self, api_key: Secret<String>) -> Result<bool, ProviderError> {
        validate_api_key(api_key.expose_secret())
            .map_err(|reason| ProviderError::NotConfigured(reason.to_string()))?;

        let mut current = self.api_key.write().unwrap_or_else(PoisonError::into_inner);
        if current.expose_secret() == api_key.expose_secret() {
            return Ok(false);
        }
        *current = api_key;
        Ok(true)
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}
