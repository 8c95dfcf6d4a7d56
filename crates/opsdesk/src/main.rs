//! opsdesk - role-based multi-tenant CRUD backend.

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use opsdesk::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    cli.command.run().await
}
