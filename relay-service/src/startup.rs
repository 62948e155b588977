//! Router assembly and server lifecycle for the relay.

use crate::config::RelayConfig;
use crate::services::CompletionProvider;
use crate::{handlers, middleware, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    http_trace_layer, ip_rate_limit_middleware, request_id_middleware, request_log_middleware,
    security_headers_middleware, spawn_rate_limit_pruner, ContentPolicy,
};
use service_core::observability::{metrics_handler, prometheus_handle};
use service_core::shutdown::shutdown_signal;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    prometheus_handle();

    // The key check runs as a route layer so it rejects before the body is read.
    let claude_route = Router::new()
        .route("/api/claude", post(handlers::claude::claude))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::api_key::require_api_key,
        ));

    let ip_limiter = state.ip_rate_limiter.clone();

    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(metrics_handler))
        .merge(claude_route)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        .layer(from_fn(request_log_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(from_fn_with_state(
            ContentPolicy::Api,
            security_headers_middleware,
        ))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bind the listener (port 0 picks a free port) and assemble the router.
    pub async fn build(
        config: RelayConfig,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let prune_every = Duration::from_secs(config.rate_limit.window_seconds);
        let state = AppState::new(config, provider);
        spawn_rate_limit_pruner(state.ip_rate_limiter.clone(), prune_every);
        let router = build_router(state);

        tracing::info!("Relay service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}
