use crate::config::GatewayConfig;
use crate::{handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
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
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    prometheus_handle();

    let static_files = ServeDir::new(&state.config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(handlers::not_found.into_service());
    let ip_limiter = state.ip_rate_limiter.clone();

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/ask", post(handlers::ask::ask))
        .fallback_service(static_files)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        .layer(from_fn(request_log_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(from_fn_with_state(
            ContentPolicy::WebApp,
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
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            relay = %config.relay.base_url,
            auth = config.auth.describe(),
            static_dir = %config.static_dir.display(),
            "Web gateway listening on port {}",
            port
        );

        let prune_every = Duration::from_secs(config.rate_limit.window_seconds);
        let state = AppState::new(config)?;
        spawn_rate_limit_pruner(state.ip_rate_limiter.clone(), prune_every);
        let router = build_router(state);

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
