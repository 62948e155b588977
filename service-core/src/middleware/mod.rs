pub mod rate_limit;
pub mod request_log;
pub mod security_headers;
pub mod tracing;

pub use rate_limit::{
    IpRateLimiter, create_ip_rate_limiter, ip_rate_limit_middleware, spawn_rate_limit_pruner,
};
pub use request_log::request_log_middleware;
pub use security_headers::{ContentPolicy, security_headers_middleware};
pub use self::tracing::{REQUEST_ID_HEADER, RequestId, http_trace_layer, request_id_middleware};
