pub mod logging;
pub mod metrics;
pub mod trace_context;

pub use logging::init_tracing;
pub use self::metrics::{metrics_handler, prometheus_handle};
pub use trace_context::{TRACEPARENT_HEADER, TRACESTATE_HEADER, inject_trace_context, trace_headers};
