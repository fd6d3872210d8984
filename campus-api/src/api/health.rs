//! Health check endpoint

use axum::Json;
use serde_json::json;

/// GET /health
///
/// Health check endpoint for monitoring. No authentication, no prefix.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "campus-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
