pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;

use crate::config::GatewayConfig;
use crate::services::RelayClient;
use service_core::error::AppError;
use service_core::middleware::IpRateLimiter;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub relay: Arc<RelayClient>,
    pub ip_rate_limiter: IpRateLimiter,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, AppError> {
        let relay = RelayClient::new(&config)?;
        let ip_rate_limiter = IpRateLimiter::new(&config.rate_limit);

        Ok(Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
            ip_rate_limiter,
        })
    }
}
