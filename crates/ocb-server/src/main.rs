//! OpenClaw Board server.
//!
//! Serves the REST API and the WebSocket push channel over one listener.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokio::net::TcpListener;

use ocb_core::BoardBuilder;
use ocb_server::routes::create_router;

/// OpenClaw Board server
///
/// Hosts the kanban board shared between a human and an AI agent: a JSON
/// API under /api, a WebSocket push channel at /ws, and a health probe.
#[derive(Parser)]
#[command(version, about, name = "ocb-server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/openclaw/board.db
    #[arg(long)]
    database_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        bind,
        port,
        database_file,
    } = Args::parse();

    let board = BoardBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize board")?;

    let app = create_router(Arc::new(board));

    let address = format!("{bind}:{port}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!("OpenClaw Board listening on http://{address}");
    info!("WebSocket channel on ws://{address}/ws");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received");
}
