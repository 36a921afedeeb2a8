//! OpenClaw Board CLI
//!
//! Command-line client for the board's REST API, built for the agent side
//! of the workflow. Failures print `Error: <message>` and exit non-zero.

mod args;
mod client;
mod commands;
mod format;

use anyhow::Result;
use clap::Parser;
use log::debug;

use args::Args;
use client::{ApiClient, DEFAULT_API_URL};
use format::Paint;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        api_url,
        no_color,
        command,
    } = Args::parse();

    let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
    debug!("using board API at {api_url}");

    let client = ApiClient::new(api_url);
    let paint = Paint::new(!no_color);

    commands::run(command, &client, &paint).await
}
