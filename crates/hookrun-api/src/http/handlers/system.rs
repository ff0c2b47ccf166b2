//! Health check and root redirect.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::{Value, json};

/// GET /health - report server liveness.
pub async fn health() -> Json<Value> {
    let response = json!({
        "status": "OK",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    tracing::info!("health check request: {response}");
    Json(response)
}

/// GET / - redirect to the health check.
///
/// Built by hand: `Redirect::to` answers 303, and this endpoint answers a
/// plain 302.
pub async fn root() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/health")])
}
