//! Process-wide Prometheus recorder backing the `metrics` macros.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the recorder on first call; later calls return the same handle.
pub fn prometheus_handle() -> &'static PrometheusHandle {
    HANDLE.get_or_init(|| {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        if metrics::set_global_recorder(recorder).is_err() {
            tracing::warn!("A metrics recorder was already installed");
        }
        handle
    })
}

/// `GET /metrics` handler.
pub async fn metrics_handler() -> String {
    prometheus_handle().render()
}
