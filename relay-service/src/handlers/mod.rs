pub mod claude;
pub mod health;

use axum::http::{Method, Uri};
use service_core::error::AppError;

/// JSON 404 for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} {} not found", method, uri.path()))
}
