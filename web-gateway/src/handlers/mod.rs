pub mod ask;
pub mod health;

use axum::http::{Method, Uri};
use service_core::error::AppError;

/// JSON 404 once the static lookup has missed.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} {} not found", method, uri.path()))
}
