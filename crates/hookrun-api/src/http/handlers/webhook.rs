//! GitHub webhook endpoint.
//!
//! `POST /{project}` verifies the `X-Hub-Signature-256` header over the
//! raw request body, then launches `{project}.sh` in the background. The
//! response is sent as soon as the script task is spawned; the script's
//! outcome is visible only in the log.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde_json::{Value, json};

use hookrun_core::signature::verify_signature;
use hookrun_types::error::DispatchError;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /{project} - receive a GitHub webhook and trigger the project
/// script.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Path(project): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    tracing::info!(project = %project, "received webhook");

    let signature = headers
        .get("x-hub-signature-256")
        .and_then(|v| v.to_str().ok());

    if !verify_signature(state.config.webhook_secret.as_deref(), &body, signature) {
        tracing::warn!(project = %project, "invalid signature - rejecting request");
        return Err(AppError::InvalidSignature);
    }

    state.dispatcher.dispatch(&project).map_err(|err| match err {
        DispatchError::ScriptNotFound(name) => {
            tracing::error!(project = %project, "script not found: {name}");
            AppError::WebhookScriptNotFound(name)
        }
    })?;

    tracing::info!(project = %project, "script started in background task");

    Ok(Json(json!({ "status": "OK", "project": project })))
}
