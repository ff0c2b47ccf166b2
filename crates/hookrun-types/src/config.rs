//! Server configuration for hookrun.
//!
//! `ServerConfig` holds everything read from the environment at startup.
//! It is constructed once (see `hookrun-infra::config`) and passed into the
//! handlers explicitly -- nothing reads the environment after load.

use std::path::PathBuf;

/// Immutable runtime configuration, loaded once at process start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Shared secret for GitHub webhook signatures (`WEBHOOK_SECRET`).
    ///
    /// `None` disables signature verification entirely; every webhook is
    /// accepted and a warning is logged per request.
    pub webhook_secret: Option<String>,

    /// Password for the manual trigger route (`PASS`).
    ///
    /// `None` makes every `/manual/{project}` request fail with a server
    /// configuration error.
    pub manual_password: Option<String>,

    /// Directory holding the `{project}.sh` scripts (`SCRIPTS_DIR`).
    pub scripts_dir: PathBuf,

    /// Directory for the rotating server log file (`LOG_DIR`).
    pub log_dir: PathBuf,

    /// HTTP listen port (`PORT`).
    pub port: u16,

    /// CORS origins allowed to call the API (`ALLOWED_ORIGINS`).
    pub allowed_origins: Vec<String>,
}

pub(crate) fn default_scripts_dir() -> PathBuf {
    PathBuf::from("./scripts")
}

pub(crate) fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

pub(crate) fn default_port() -> u16 {
    9000
}

pub(crate) fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:9000".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            manual_password: None,
            scripts_dir: default_scripts_dir(),
            log_dir: default_log_dir(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}
