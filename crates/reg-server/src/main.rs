//! `registrar`: loads configuration, opens the stores, and serves the
//! registration endpoint until ctrl-c.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use reg_config::RegistrarConfig;
use reg_server::{AppState, build_router};

mod cli;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("registrar error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config =
        RegistrarConfig::load_with_dotenv().context("failed to load registrar configuration")?;
    cli.apply(&mut config);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    let state = AppState::init(&config)
        .await
        .context("failed to initialize application state")?;
    let app = build_router(Arc::new(state), config.server.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, database = %config.database.path, "registrar listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("registrar stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("REGISTRAR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
