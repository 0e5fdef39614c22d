//! Key Tagger (wkmp-kt) - Main entry point
//!
//! Long-running helper that reads and writes musical key tags in audio
//! files. Requests arrive as JSON lines on stdin; responses, the ready
//! message and heartbeats go to stdout. All diagnostics go to stderr.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wkmp_kt::config::{ServerConfig, TomlConfig};
use wkmp_kt::Server;

/// Command-line arguments for wkmp-kt
#[derive(Parser, Debug)]
#[command(name = "wkmp-kt")]
#[command(about = "Key tagging server (stdin/stdout JSON protocol)")]
#[command(version)]
struct Args {
    /// Number of worker threads (default: 4)
    #[arg(short, long, env = "WKMP_KT_WORKERS")]
    workers: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = TomlConfig::locate();
    let (toml_config, toml_error) = match config_path.as_deref().map(TomlConfig::read) {
        None => (TomlConfig::default(), None),
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (TomlConfig::default(), Some(e)),
    };

    // Initialize tracing (stderr only; stdout carries the protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting WKMP Key Tagger v{}", env!("CARGO_PKG_VERSION"));
    match (&config_path, toml_error) {
        (Some(path), None) => info!("Loaded bootstrap config from {}", path.display()),
        (Some(path), Some(e)) => {
            warn!("Ignoring bootstrap config {}: {}. Using defaults.", path.display(), e)
        }
        (None, _) => debug!("No bootstrap config found, using defaults"),
    }

    let config = ServerConfig::resolve(args.workers, &toml_config)
        .context("Invalid server configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(serve(config))?;

    // A stdin read still parked on the blocking pool must not hold up exit
    runtime.shutdown_timeout(Duration::from_millis(100));
    Ok(())
}

async fn serve(config: ServerConfig) -> Result<()> {
    let server = Server::new(config);
    tokio::spawn(cancel_on_signal(server.shutdown_token()));

    let input = BufReader::new(tokio::io::stdin());
    server
        .run(input, tokio::io::stdout())
        .await
        .context("Server error")?;
    Ok(())
}

/// Cancel `token` on Ctrl+C or SIGTERM
async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
    token.cancel();
}
