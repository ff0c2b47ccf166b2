//! hookrun server entry point.
//!
//! Binary name: `hookrun`
//!
//! Parses CLI arguments, loads the environment configuration, initializes
//! logging, then serves the webhook API until Ctrl+C or SIGTERM.

mod http;
mod state;

use clap::Parser;

use state::AppState;

/// GitHub webhook listener that runs per-project shell scripts.
#[derive(Debug, Parser)]
#[command(name = "hookrun", version)]
struct Cli {
    /// Bind address.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Listen port; overrides the PORT environment variable.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = hookrun_infra::config::load_from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.log_dir = hookrun_observe::tracing_setup::init_tracing(&config.log_dir)?;

    if config.webhook_secret.is_none() {
        tracing::warn!("WEBHOOK_SECRET not set - signature verification disabled");
    }
    tracing::info!(port = config.port, "starting webhook server");
    tracing::info!(path = %config.scripts_dir.display(), "scripts directory");
    tracing::info!(path = %config.log_dir.display(), "log directory");

    let addr = format!("{}:{}", cli.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let state = AppState::new(config);
    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
