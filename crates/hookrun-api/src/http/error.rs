//! Application error type mapping to HTTP status codes and JSON bodies.
//!
//! Every error becomes a flat `{"error": "<message>"}` body. The two
//! script-not-found variants deliberately carry different status codes:
//! the webhook route answers 500 while the manual route answers 404. The
//! asymmetry is a documented quirk of the API surface and is kept visible
//! here rather than unified.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use hookrun_types::error::AuthError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Webhook signature verification failed (403).
    InvalidSignature,
    /// Manual trigger password missing or wrong (401).
    InvalidPassword,
    /// Manual trigger password not configured server-side (500).
    PasswordNotConfigured,
    /// Script missing for a webhook trigger (500). Carries the script
    /// file name.
    WebhookScriptNotFound(String),
    /// Script missing for a manual trigger (404). Carries the script
    /// file name.
    ManualScriptNotFound(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidPassword => AppError::InvalidPassword,
            AuthError::PasswordNotConfigured => AppError::PasswordNotConfigured,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidSignature => {
                (StatusCode::FORBIDDEN, "Invalid signature".to_string())
            }
            AppError::InvalidPassword => {
                (StatusCode::UNAUTHORIZED, "Invalid password".to_string())
            }
            AppError::PasswordNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error".to_string(),
            ),
            AppError::WebhookScriptNotFound(name) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Script not found: {name}"),
            ),
            AppError::ManualScriptNotFound(name) => {
                (StatusCode::NOT_FOUND, format!("Script not found: {name}"))
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
