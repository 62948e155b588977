//! Identity tokens from the platform metadata server.

use crate::config::IdentitySettings;
use reqwest::Client;
use secrecy::Secret;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Metadata request failed: {0}")]
    Request(String),

    #[error("Metadata server returned {0}")]
    Status(u16),

    #[error("Metadata server returned an empty token")]
    Empty,
}

pub struct IdentityClient {
    client: Client,
    metadata_url: String,
}

impl IdentityClient {
    pub fn new(settings: &IdentitySettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            metadata_url: settings.metadata_url.clone(),
        })
    }

    /// Fetch a fresh token scoped to `audience`. Tokens are never cached.
    pub async fn fetch_token(&self, audience: &str) -> Result<Secret<String>, IdentityError> {
        let response = self
            .client
            .get(&self.metadata_url)
            .query(&[("audience", audience)])
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Status(status.as_u16()));
        }

        let token = response
            .text()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        let token = token.trim();
        if token.is_empty() {
            return Err(IdentityError::Empty);
        }

        Ok(Secret::new(token.to_string()))
    }
}
