use crate::{config::RateLimitConfig, error::AppError};
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::keyed::DashMapStateStore,
};
use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};
use tokio::task::JoinHandle;

type KeyedLimiter = RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock>;

/// Rate limiter keyed by client IP address
#[derive(Clone)]
pub struct IpRateLimiter {
    limiter: Arc<KeyedLimiter>,
    trust_forwarded_for: bool,
}

impl IpRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        create_ip_rate_limiter(config.requests, config.window_seconds)
            .trusting_forwarded_for(config.trust_forwarded_for)
    }

    /// Key on the first `x-forwarded-for` hop rather than the socket peer.
    pub fn trusting_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Number of client addresses currently holding limiter state.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Drop state for clients whose quota has fully replenished.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Client address used as the limiter key.
    fn client_ip(&self, request: &Request) -> Option<IpAddr> {
        let forwarded_ip = if self.trust_forwarded_for {
            request
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        } else {
            None
        };

        forwarded_ip.or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
    }
}

/// Create a keyed rate limiter allowing `attempts` per `window_seconds` per IP.
/// Clients are keyed on the socket peer.
pub fn create_ip_rate_limiter(attempts: u32, window_seconds: u64) -> IpRateLimiter {
    let attempts = NonZeroU32::new(attempts.max(1)).unwrap_or(NonZeroU32::MIN);
    let window_ms = window_seconds.max(1) * 1000;
    let period = Duration::from_millis((window_ms / u64::from(attempts.get())).max(1));
    let quota = Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_minute(attempts))
        .allow_burst(attempts);

    IpRateLimiter {
        limiter: Arc::new(RateLimiter::dashmap(quota)),
        trust_forwarded_for: false,
    }
}

/// Prune replenished limiter state every `every` until the runtime stops.
pub fn spawn_rate_limit_pruner(limiter: IpRateLimiter, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every.max(Duration::from_secs(1)));
        interval.tick().await;
        loop {
            interval.tick().await;
            limiter.prune();
            tracing::debug!(clients = limiter.tracked_clients(), "Pruned rate limiter state");
        }
    })
}

/// Middleware for IP-based rate limiting
pub async fn ip_rate_limit_middleware(
    State(limiter): State<IpRateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match limiter.client_ip(&request) {
        Some(ip) => match limiter.limiter.check_key(&ip) {
            Ok(_) => Ok(next.run(request).await),
            Err(negative) => {
                let wait_time = negative.wait_time_from(DefaultClock::default().now());
                tracing::warn!(ip = %ip, "Rate limit exceeded");
                Err(AppError::TooManyRequests(
                    "Too many requests from this IP. Please try again later.".to_string(),
                    Some(wait_time.as_secs().max(1)),
                ))
            }
        },
        None => {
            tracing::warn!("Could not determine IP for rate limiting");
            Ok(next.run(request).await)
        }
    }
}
