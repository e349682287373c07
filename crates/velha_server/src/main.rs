//! Velha - unified CLI
//!
//! Runs the relay server or a terminal game against the computer.

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use velha_server::cli::{Cli, Command};
use velha_server::{PlayConfig, Registry, ServerConfig, play, router};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host, config } => {
            init_tracing("info,velha_server=debug,velha_tictactoe=info");
            let config = ServerConfig::resolve(config.as_deref(), host, port)?;
            run_server(config).await
        }
        Command::Play {
            difficulty,
            delay_ms,
            scores_dir,
        } => {
            // Keep the board readable: only warnings reach stderr by default.
            init_tracing("warn");
            play::run(PlayConfig::new(
                difficulty,
                Duration::from_millis(delay_ms),
                scores_dir,
            ))
            .await
        }
    }
}

fn init_tracing(default: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

/// Run the relay server until Ctrl-C or SIGTERM.
#[instrument(skip_all, fields(address = %config.address()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    info!("Starting velha relay server");

    let app = router(Registry::new());
    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
