use thiserror::Error;

/// Errors from verifying a manual trigger credential.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The supplied password was missing or did not match.
    #[error("invalid password")]
    InvalidPassword,

    /// No password is configured server-side, so manual triggers cannot
    /// be authenticated at all.
    #[error("manual trigger password not configured")]
    PasswordNotConfigured,
}

/// Errors from dispatching a project script.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No `{project}.sh` exists under the scripts directory. The payload is
    /// the script file name (e.g. `demo.sh`).
    #[error("script not found: {0}")]
    ScriptNotFound(String),
}
