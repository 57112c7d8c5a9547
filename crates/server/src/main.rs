//! HTTP server for the cast reports.
//!
//! Serves `/moviesPerActor`, `/actorsWithMultipleCharacters` and
//! `/charactersWithMultipleActors` as JSON until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::{PipelineArgs, router};

/// Cast reports HTTP server
#[derive(Parser)]
#[command(name = "cast-reports-server")]
#[command(about = "Serves cast reports over a movie catalogue", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let orchestrator = cli
        .pipeline
        .build_orchestrator()
        .context("Failed to initialize report pipeline")?;
    info!(
        "Pipeline ready (cache TTL: {:?}, concurrency: {})",
        orchestrator.cache().default_ttl(),
        orchestrator.concurrency_limit()
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server is running on {}", addr);

    axum::serve(listener, router(Arc::new(orchestrator)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
