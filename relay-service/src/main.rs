use relay_service::config::{key_fingerprint, RelayAuth, RelayConfig};
use relay_service::services::key_reload::spawn_sighup_reload;
use relay_service::services::providers::anthropic::AnthropicProvider;
use relay_service::services::CompletionProvider;
use relay_service::startup::Application;
use service_core::observability::init_tracing;
use std::fmt::Display;
use std::sync::Arc;

fn fatal(reason: impl Display) -> ! {
    tracing::error!("FATAL: {}", reason);
    eprintln!("FATAL: {}", reason);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Tracing starts before a config error is reported so the failure is logged.
    let config = RelayConfig::load();
    let (log_level, otlp_endpoint) = match &config {
        Ok(config) => (
            config.common.log_level.clone(),
            config.common.otlp_endpoint.clone(),
        ),
        Err(_) => ("info".to_string(), None),
    };
    init_tracing("relay-service", &log_level, otlp_endpoint.as_deref());

    let config = config.unwrap_or_else(|e| fatal(e));

    let anthropic = AnthropicProvider::new(&config.anthropic).unwrap_or_else(|e| fatal(e));
    tracing::info!(
        model = %anthropic.model(),
        key = %key_fingerprint(&config.anthropic.api_key),
        "Initialized Anthropic provider"
    );

    match &config.auth {
        RelayAuth::SharedKey(_) => tracing::info!("x-api-key required on /api/claude"),
        RelayAuth::Platform => tracing::warn!(
            "No SERVICE_API_KEY configured; relying on platform authorization for /api/claude"
        ),
    }

    let provider: Arc<dyn CompletionProvider> = Arc::new(anthropic);
    spawn_sighup_reload(provider.clone());

    let application = Application::build(config, provider)
        .await
        .unwrap_or_else(|e| fatal(e));
    application.run_until_stopped().await?;

    Ok(())
}
