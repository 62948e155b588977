use service_core::observability::init_tracing;
use std::fmt::Display;
use web_gateway::config::GatewayConfig;
use web_gateway::startup::Application;

fn fatal(reason: impl Display) -> ! {
    tracing::error!("FATAL: {}", reason);
    eprintln!("FATAL: {}", reason);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Tracing starts before a config error is reported so the failure is logged.
    let config = GatewayConfig::load();
    let (log_level, otlp_endpoint) = match &config {
        Ok(config) => (
            config.common.log_level.clone(),
            config.common.otlp_endpoint.clone(),
        ),
        Err(_) => ("info".to_string(), None),
    };
    init_tracing("web-gateway", &log_level, otlp_endpoint.as_deref());

    let config = config.unwrap_or_else(|e| fatal(e));

    let application = Application::build(config)
        .await
        .unwrap_or_else(|e| fatal(e));
    application.run_until_stopped().await?;

    Ok(())
}
