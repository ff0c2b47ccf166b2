//! Environment configuration loader.
//!
//! Reads `WEBHOOK_SECRET`, `PASS`, `SCRIPTS_DIR`, `LOG_DIR`, `PORT` and
//! `ALLOWED_ORIGINS` once at startup. Empty strings count as unset, so an
//! `export WEBHOOK_SECRET=` line disables verification the same way a
//! missing variable does.

use anyhow::Context;

use hookrun_types::config::ServerConfig;

/// Load the server configuration from the process environment.
///
/// Unset variables fall back to the [`ServerConfig::default`] values. A
/// non-numeric `PORT` is a startup error.
pub fn load_from_env() -> anyhow::Result<ServerConfig> {
    from_lookup(|key| std::env::var(key).ok())
}

fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::default();

    config.webhook_secret = get("WEBHOOK_SECRET").filter(|s| !s.is_empty());
    config.manual_password = get("PASS").filter(|s| !s.is_empty());

    if let Some(dir) = get("SCRIPTS_DIR") {
        config.scripts_dir = dir.into();
    }
    if let Some(dir) = get("LOG_DIR") {
        config.log_dir = dir.into();
    }
    if let Some(raw) = get("PORT") {
        config.port = raw
            .parse()
            .with_context(|| format!("invalid PORT value: '{raw}'"))?;
    }
    if let Some(raw) = get("ALLOWED_ORIGINS") {
        let origins: Vec<String> = raw
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if !origins.is_empty() {
            config.allowed_origins = origins;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.scripts_dir, PathBuf::from("./scripts"));
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
        assert_eq!(config.allowed_origins, vec!["http://localhost:9000"]);
        assert!(config.webhook_secret.is_none());
        assert!(config.manual_password.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = from_lookup(lookup(&[
            ("WEBHOOK_SECRET", "hunter2"),
            ("PASS", "abc123"),
            ("SCRIPTS_DIR", "/opt/hooks"),
            ("LOG_DIR", "/var/log/hookrun"),
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();

        assert_eq!(config.webhook_secret.as_deref(), Some("hunter2"));
        assert_eq!(config.manual_password.as_deref(), Some("abc123"));
        assert_eq!(config.scripts_dir, PathBuf::from("/opt/hooks"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/hookrun"));
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn empty_secrets_count_as_unset() {
        let config = from_lookup(lookup(&[("WEBHOOK_SECRET", ""), ("PASS", "")])).unwrap();
        assert!(config.webhook_secret.is_none());
        assert!(config.manual_password.is_none());
    }

    #[test]
    fn invalid_port_is_a_startup_error() {
        let err = from_lookup(lookup(&[("PORT", "ninety")])).unwrap_err();
        assert!(err.to_string().contains("invalid PORT value"));
    }

    #[test]
    fn blank_origin_entries_are_dropped() {
        let config =
            from_lookup(lookup(&[("ALLOWED_ORIGINS", "https://a.example,,  ")])).unwrap();
        assert_eq!(config.allowed_origins, vec!["https://a.example"]);
    }

    #[test]
    fn all_blank_origins_fall_back_to_default() {
        let config = from_lookup(lookup(&[("ALLOWED_ORIGINS", " , ")])).unwrap();
        assert_eq!(config.allowed_origins, vec!["http://localhost:9000"]);
    }
}
