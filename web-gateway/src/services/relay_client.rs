//! Client for the relay service's `POST /api/claude`.

use crate::config::{GatewayConfig, UpstreamAuth};
use crate::services::identity::IdentityClient;
use reqwest::header::{HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::error::AppError;
use service_core::observability::trace_headers;
use service_core::prompt::{Prompt, PromptRequest, TextReply};
use std::time::Duration;

const UNREACHABLE_MESSAGE: &str = "Failed to reach API service";
const UPSTREAM_FALLBACK_MESSAGE: &str = "upstream error";

/// Relay error bodies carry a `message`; anything else gets a fallback.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: Option<String>,
}

pub struct RelayClient {
    client: Client,
    endpoint: String,
    audience: String,
    auth: UpstreamAuth,
    identity: IdentityClient,
}

impl RelayClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.relay.timeout_seconds))
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("HTTP client: {}", e)))?;
        let identity = IdentityClient::new(&config.identity)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/claude", config.relay.base_url),
            audience: config.relay.base_url.clone(),
            auth: config.auth.clone(),
            identity,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Forward one prompt. Non-2xx answers are mirrored; no answer at all is a
    /// 502.
    pub async fn ask(&self, prompt: &Prompt, request_id: Option<&str>) -> Result<String, AppError> {
        let mut headers = trace_headers(request_id);

        match &self.auth {
            UpstreamAuth::LocalStaticKey(Some(key)) => {
                headers.insert("x-api-key", sensitive_header(key)?);
            }
            UpstreamAuth::LocalStaticKey(None) => {}
            UpstreamAuth::PlatformIdentityToken => {
                let token = self.identity.fetch_token(&self.audience).await.map_err(|e| {
                    tracing::error!("ask error: identity token unavailable: {}", e);
                    AppError::BadGateway(UNREACHABLE_MESSAGE.to_string())
                })?;
                let bearer = Secret::new(format!("Bearer {}", token.expose_secret()));
                headers.insert(AUTHORIZATION, sensitive_header(&bearer)?);
            }
        }

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&PromptRequest::from(prompt))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("ask error: failed to send POST to {}: {}", self.endpoint, e);
                AppError::BadGateway(UNREACHABLE_MESSAGE.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let message = response
                .json::<UpstreamErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string());

            tracing::warn!(status = status.as_u16(), message = %message, "Relay service returned an error");
            return Err(AppError::Upstream {
                status,
                message,
                retry_after,
            });
        }

        let reply: TextReply = response.json().await.map_err(|e| {
            tracing::error!("ask error: undecodable relay response: {}", e);
            AppError::BadGateway(UNREACHABLE_MESSAGE.to_string())
        })?;

        Ok(reply.text)
    }
}

fn sensitive_header(value: &Secret<String>) -> Result<HeaderValue, AppError> {
    let mut header = HeaderValue::from_str(value.expose_secret()).map_err(|_| {
        AppError::InternalError(anyhow::anyhow!("credential is not a valid header value"))
    })?;
    header.set_sensitive(true);
    Ok(header)
}
