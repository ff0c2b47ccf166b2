//! Tracing subscriber initialization: human-readable stderr output plus a
//! rotating file sink.
//!
//! The stderr layer respects `RUST_LOG` (default `info`); the file layer
//! records DEBUG and up without ANSI colors, writing through
//! [`RotatingFileWriter`](crate::log_rotation::RotatingFileWriter).

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::log_rotation::{
    MAX_LOG_BYTES, MAX_ROTATED_FILES, RETENTION, RotatingFileWriter, prune_old_backups,
    rotate_if_needed,
};

/// Name of the live log file inside the log directory.
pub const LOG_FILE_NAME: &str = "hookrun.log";

/// Initialize the global tracing subscriber.
///
/// Creates `log_dir` if needed, falling back to `./logs` when that fails
/// (e.g. the configured directory is not writable). An oversized log left
/// over from a previous run is rotated before the sink opens, and backups
/// past the retention window are pruned. Returns the directory actually
/// used.
///
/// # Errors
/// Fails when neither directory can be created, when the log file cannot
/// be opened, or when a global subscriber is already installed.
pub fn init_tracing(log_dir: &Path) -> anyhow::Result<PathBuf> {
    let log_dir = ensure_log_dir(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);

    rotate_if_needed(&log_path, MAX_LOG_BYTES, MAX_ROTATED_FILES)
        .with_context(|| format!("failed to rotate {}", log_path.display()))?;
    prune_old_backups(&log_path, MAX_ROTATED_FILES, RETENTION)
        .with_context(|| format!("failed to prune old copies of {}", log_path.display()))?;

    let writer = RotatingFileWriter::new(log_path, MAX_LOG_BYTES, MAX_ROTATED_FILES, RETENTION)
        .with_context(|| format!("failed to open log file in {}", log_dir.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("global tracing subscriber already set")?;

    Ok(log_dir)
}

/// Create the log directory, falling back to `./logs` when the configured
/// one cannot be created.
fn ensure_log_dir(log_dir: &Path) -> anyhow::Result<PathBuf> {
    match std::fs::create_dir_all(log_dir) {
        Ok(()) => Ok(log_dir.to_path_buf()),
        Err(err) => {
            // Tracing is not up yet, so this warning goes to stderr raw.
            eprintln!(
                "warning: cannot create log directory {}: {err}; falling back to ./logs",
                log_dir.display()
            );
            let fallback = PathBuf::from("./logs");
            std::fs::create_dir_all(&fallback)
                .context("failed to create fallback log directory ./logs")?;
            Ok(fallback)
        }
    }
}
