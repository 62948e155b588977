//! service-core: Shared infrastructure for the prompt relay services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod prompt;
pub mod shutdown;

pub use axum;
pub use reqwest;
pub use secrecy;
pub use serde_json;
pub use tokio;
pub use tracing;
