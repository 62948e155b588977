//! Post-deployment smoke checks against a running web gateway.
//!
//! Three checks run in order and the first failure stops the run:
//!
//! 1. `GET /health` answers 200 `{"status":"ok"}`
//! 2. `POST /api/ask {}` answers 400
//! 3. `POST /api/ask` with a real prompt answers 200 with non-empty `text`
//!
//! ```bash
//! WEB_SERVICE_URL=https://web-abc123-uc.a.run.app cargo run -p smoke-tests --bin smoke
//! ```

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(4);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_PROMPT: &str = "Reply with exactly three words: smoke test passed";

#[derive(Error, Debug)]
pub enum SmokeError {
    #[error("{url} unreachable after {attempts} attempt(s): {source}")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("{check}: expected {expected}, got {actual}")]
    UnexpectedStatus {
        check: &'static str,
        expected: StatusCode,
        actual: StatusCode,
    },

    #[error("{check}: {detail}")]
    UnexpectedBody { check: &'static str, detail: String },

    #[error("HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct SmokeConfig {
    pub base_url: String,
    pub attempts: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    pub prompt: String,
}

impl SmokeConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            attempts: DEFAULT_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// Result of a passing run.
#[derive(Debug, Clone)]
pub struct SmokeReport {
    pub passed: usize,
    pub reply: String,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AskBody {
    text: Option<Value>,
}

pub struct SmokeRunner {
    client: Client,
    config: SmokeConfig,
}

impl SmokeRunner {
    pub fn new(config: SmokeConfig) -> Result<Self, SmokeError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Send with bounded retries. Only transport failures are retried; any
    /// HTTP answer is returned to the caller as-is.
    async fn send_with_retry<F>(&self, url: &str, build: F) -> Result<Response, SmokeError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let attempts = self.config.attempts.max(1);
        let mut attempt = 1;

        loop {
            match build(&self.client).send().await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        url = %url,
                        "Retry {}/{} after {}ms ({})",
                        attempt,
                        attempts - 1,
                        self.config.retry_delay.as_millis(),
                        e
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(source) => {
                    return Err(SmokeError::Transport {
                        url: url.to_string(),
                        attempts,
                        source,
                    })
                }
            }
        }
    }

    fn expect_status(
        check: &'static str,
        response: &Response,
        expected: StatusCode,
    ) -> Result<(), SmokeError> {
        if response.status() != expected {
            return Err(SmokeError::UnexpectedStatus {
                check,
                expected,
                actual: response.status(),
            });
        }
        Ok(())
    }

    pub async fn check_health(&self) -> Result<(), SmokeError> {
        const CHECK: &str = "GET /health";
        let url = self.url("/health");
        let response = self.send_with_retry(&url, |c| c.get(&url)).await?;
        Self::expect_status(CHECK, &response, StatusCode::OK)?;

        let body: HealthBody = response.json().await.map_err(|e| SmokeError::UnexpectedBody {
            check: CHECK,
            detail: e.to_string(),
        })?;
        if body.status.as_deref() != Some("ok") {
            return Err(SmokeError::UnexpectedBody {
                check: CHECK,
                detail: format!("unexpected health body: {:?}", body),
            });
        }
        Ok(())
    }

    pub async fn check_missing_prompt(&self) -> Result<(), SmokeError> {
        let url = self.url("/api/ask");
        let response = self
            .send_with_retry(&url, |c| c.post(&url).json(&json!({})))
            .await?;
        Self::expect_status("POST /api/ask (no prompt)", &response, StatusCode::BAD_REQUEST)
    }

    /// Returns the reply text.
    pub async fn check_prompt(&self) -> Result<String, SmokeError> {
        const CHECK: &str = "POST /api/ask";
        let url = self.url("/api/ask");
        let body = json!({ "prompt": self.config.prompt });
        let response = self
            .send_with_retry(&url, |c| c.post(&url).json(&body))
            .await?;
        Self::expect_status(CHECK, &response, StatusCode::OK)?;

        let body: AskBody = response.json().await.map_err(|e| SmokeError::UnexpectedBody {
            check: CHECK,
            detail: e.to_string(),
        })?;
        match body.text {
            Some(Value::String(text)) if !text.is_empty() => Ok(text),
            _ => Err(SmokeError::UnexpectedBody {
                check: CHECK,
                detail: "Response missing text".to_string(),
            }),
        }
    }

    pub async fn run(&self) -> Result<SmokeReport, SmokeError> {
        self.check_health().await?;
        tracing::info!("GET /health -> 200 {{ status: ok }}");

        self.check_missing_prompt().await?;
        tracing::info!("POST /api/ask (no prompt) -> 400");

        let reply = self.check_prompt().await?;
        tracing::info!("POST /api/ask -> 200");

        Ok(SmokeReport { passed: 3, reply })
    }
}
