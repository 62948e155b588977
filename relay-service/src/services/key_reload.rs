//! Provider key rotation without a restart.

use crate::config::key_fingerprint;
use crate::services::{CompletionProvider, ProviderError};
use secrecy::Secret;
use std::sync::Arc;

/// Re-read `ANTHROPIC_API_KEY` through `lookup` and hand it to the provider.
pub fn reload_api_key<F>(provider: &dyn CompletionProvider, lookup: &F) -> Result<bool, ProviderError>
where
    F: Fn(&str) -> Option<String>,
{
    let key = lookup("ANTHROPIC_API_KEY")
        .map(|k| k.trim().to_string())
        .unwrap_or_default();
    let key = Secret::new(key);
    let fingerprint = key_fingerprint(&key);

    let changed = provider.reconfigure(key)?;
    if changed {
        tracing::info!(key = %fingerprint, "Anthropic API key rotated");
    } else {
        tracing::info!("Anthropic API key unchanged");
    }
    Ok(changed)
}

/// Reload `.env` and the provider key on every SIGHUP.
#[cfg(unix)]
pub fn spawn_sighup_reload(provider: Arc<dyn CompletionProvider>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(hangup) => hangup,
            Err(e) => {
                tracing::error!("Failed to install SIGHUP handler: {}", e);
                return;
            }
        };

        while hangup.recv().await.is_some() {
            tracing::info!("SIGHUP received, reloading Anthropic API key");
            dotenvy::dotenv_override().ok();
            if let Err(e) = reload_api_key(provider.as_ref(), &service_core::config::process_env) {
                tracing::error!("Key reload rejected, keeping current key: {}", e);
            }
        }
    });
}

#[cfg(not(unix))]
pub fn spawn_sighup_reload(_provider: Arc<dyn CompletionProvider>) {}
