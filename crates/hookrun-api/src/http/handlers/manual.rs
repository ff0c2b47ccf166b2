//! Password-protected manual trigger endpoint.
//!
//! `POST /manual/{project}` accepts the password in the `X-Password`
//! header or the `password` query parameter; the header wins when both
//! are present.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};

use hookrun_core::password::verify_password;
use hookrun_types::error::DispatchError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters for the manual trigger endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ManualTriggerQuery {
    /// Fallback password when the `X-Password` header is absent.
    pub password: Option<String>,
}

/// POST /manual/{project} - trigger a project script with password
/// authentication.
pub async fn manual_trigger(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(query): Query<ManualTriggerQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    tracing::info!(project = %project, "manual trigger request");

    let header_password = headers
        .get("x-password")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let password = header_password.or(query.password);

    verify_password(state.config.manual_password.as_deref(), password.as_deref()).map_err(
        |err| {
            tracing::warn!(project = %project, error = %err, "manual trigger rejected");
            AppError::from(err)
        },
    )?;

    state.dispatcher.dispatch(&project).map_err(|err| match err {
        DispatchError::ScriptNotFound(name) => {
            tracing::error!(project = %project, "script not found: {name}");
            AppError::ManualScriptNotFound(name)
        }
    })?;

    tracing::info!(project = %project, "script started in background task (manual trigger)");

    Ok(Json(json!({
        "status": "OK",
        "project": project,
        "trigger": "manual",
    })))
}
