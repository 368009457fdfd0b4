//! HTTP route handlers.
//!
//! - `health`: liveness and version endpoints
//! - `search`: registration-number lookup against the aggregate index

pub mod health;
pub mod search;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ServerError;

/// Root informational route (GET /). No lookup happens here; it just tells
/// a browser poking at the service what it is.
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": "regserve",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/search", "/health", "/admin/version"],
    }))
}

/// 404 handler for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
