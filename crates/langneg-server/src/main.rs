//! Language negotiation server
//!
//! Serves the negotiation API from `langneg-api` with the configured
//! priorities.

mod config;

use anyhow::Context;
use clap::Parser;
use langneg_api::{init_tracing, router};
use langneg_core::{AcceptLanguageMatcher, LanguageNegotiator};
use tracing::info;

use crate::config::{Cli, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(cli.log_format).context("failed to initialize tracing")?;

    let file = match &cli.config {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?,
        ),
        None => None,
    };
    let config = ServerConfig::resolve(file.as_deref(), &cli).context("invalid configuration")?;

    let matcher = if config.strict {
        AcceptLanguageMatcher::strict()
    } else {
        AcceptLanguageMatcher::new()
    };
    let negotiator = LanguageNegotiator::new(matcher, config.negotiation.clone())?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    info!(
        bind = %config.bind,
        priorities = ?config.negotiation.priorities(),
        strict = config.strict,
        "Starting language negotiation server"
    );

    axum::serve(listener, router(negotiator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
