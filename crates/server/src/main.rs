//! offences-server: HTTP API over the Athena traffic offences view.
//!
//! Routes:
//! - `GET|POST /search?year=&month=&state=`: run the offences query
//! - `GET /filters`: dropdown metadata
//! - `GET /health`

mod api;
mod router;
mod state;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use offences_athena::AthenaConfig;

use crate::state::AppState;

// ── CLI ─────────────────────────────────────────────────────────────

/// Traffic offence search API.
#[derive(Parser, Debug)]
#[command(name = "offences-server", version, about)]
struct Cli {
    /// Listen address (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl_c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    offences_core::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = offences_core::Config::from_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // No bucket, no server: fail before binding so nothing is ever served.
    let athena_config = AthenaConfig::from_env().context("Athena configuration")?;

    config.log_summary();
    athena_config.log_summary();

    let state = AppState::from_athena_config(athena_config).await;
    let app = router::build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("offences-server exited cleanly");
    Ok(())
}
