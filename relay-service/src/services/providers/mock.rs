//! Mock provider implementation for testing.

use super::{CompletionProvider, ProviderError};
use async_trait::async_trait;
use secrecy::Secret;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted provider: every call returns the same outcome. Calls and the
/// prompts they carried are recorded.
pub struct MockProvider {
    outcome: Result<String, ProviderError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    reconfigurations: AtomicUsize,
}

impl MockProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_outcome(Ok(text.into()))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::with_outcome(Err(error))
    }

    /// Fail with a provider status, as the real API would.
    pub fn failing_with_status(status: u16, message: &str) -> Self {
        Self::failing(ProviderError::Api {
            status,
            error_type: None,
            message: message.to_string(),
            retry_after: None,
        })
    }

    fn with_outcome(outcome: Result<String, ProviderError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            reconfigurations: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn reconfigurations(&self) -> usize {
        self.reconfigurations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.outcome.clone()
    }

    fn reconfigure(&self, _api_key: Secret<String>) -> Result<bool, ProviderError> {
        self.reconfigurations.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}
