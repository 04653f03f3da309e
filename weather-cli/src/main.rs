//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive register/login/dashboard menu
//! - Wiring config, user store and weather provider together

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod menu;

fn init_tracing() {
    // Keep the menu readable unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv().or_else(|_| dotenvy::from_filename("../.env"));
    init_tracing();
    if dotenv.is_err() {
        tracing::debug!("no .env found; relying on environment variables");
    }

    let cmd = cli::Cli::parse();
    cmd.run().await
}
