//! cascade-scanner - follows the game log and serves the cascade status.
//!
//! Usage: cascade-scanner [--log-path <EE.log>] [--bind <addr>] [--save-config]

use std::path::PathBuf;
use std::sync::Arc;

use cascade_core::context::config_file_path;
use cascade_core::{AppConfig, AppConfigExt, SessionTracker, TrackerConfig};
use clap::Parser;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cascade-scanner")]
#[command(about = "Track Zariman cascade tiles from EE.log and serve the status over HTTP")]
struct Args {
    /// Game log to follow (defaults to the platform EE.log location)
    #[arg(long)]
    log_path: Option<PathBuf>,

    /// Address for the status server
    #[arg(long)]
    bind: Option<String>,

    /// Write the effective settings back to the config file
    #[arg(long)]
    save_config: bool,
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If CASCADE_LOG_FILE is set, append to that file instead of stderr
    if let Ok(path) = std::env::var("CASCADE_LOG_FILE") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();
    let args = Args::parse();

    let mut config = AppConfig::load();
    if let Some(path) = args.log_path {
        config.log_path = path.display().to_string();
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if args.save_config {
        config.save().map_err(|e| e.to_string())?;
        if let Some(path) = config_file_path() {
            tracing::info!(path = %path.display(), "Saved config");
        }
    }

    let tracker = SessionTracker::new(TrackerConfig::from_app_config(&config));
    let log_file = config.log_file();
    let tracking = match tracker.start(&log_file).await {
        Ok(handle) => Some(handle),
        Err(e) => {
            // Keep serving the default status so widgets still get a response
            tracing::error!(error = %e, "Log tracking not started");
            None
        }
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", config.bind_address))?;
    tracing::info!(
        address = %config.bind_address,
        "Status server running on http://{}{}",
        config.bind_address,
        cascade_scanner::STATUS_ROUTE
    );

    axum::serve(listener, cascade_scanner::router(Arc::clone(&tracker)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| e.to_string())?;

    tracker.stop();
    if let Some(handle) = tracking
        && let Err(e) = handle.await
    {
        tracing::error!(error = %e, "Tracking task failed");
    }
    tracing::info!("Scanner stopped");
    Ok(())
}
