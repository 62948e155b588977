pub mod config;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod startup;

use crate::config::RelayConfig;
use crate::services::CompletionProvider;
use service_core::middleware::IpRateLimiter;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub provider: Arc<dyn CompletionProvider>,
    pub ip_rate_limiter: IpRateLimiter,
}

impl AppState {
    pub fn new(config: RelayConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        let ip_rate_limiter = IpRateLimiter::new(&config.rate_limit);

        Self {
            config: Arc::new(config),
            provider,
            ip_rate_limiter,
        }
    }
}
