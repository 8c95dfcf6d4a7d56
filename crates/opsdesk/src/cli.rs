//! command-line interface: serve, migrate, seed.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use opsdesk_db::Db;
use opsdesk_types::Config;

/// opsdesk - role-based multi-tenant CRUD backend.
#[derive(Parser)]
#[command(name = "opsdesk", version, about)]
pub struct Cli {
    /// subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// top-level subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// run the http server.
    Serve,
    /// apply pending database migrations and exit.
    Migrate,
    /// provision roles, features, privileges and reference data.
    Seed,
}

impl Command {
    /// execute the subcommand.
    pub async fn run(self) -> Result<()> {
        let config = Config::default().with_env_overrides();
        match self {
            Command::Serve => serve(config).await,
            Command::Migrate => {
                let db = Db::connect(&config.database.url).await?;
                db.migrate().await?;
                info!("migrations applied");
                db.close().await?;
                Ok(())
            }
            Command::Seed => {
                let db = Db::connect(&config.database.url).await?;
                db.migrate().await?;
                crate::seed::run(&db, &config).await?;
                info!("seed complete");
                db.close().await?;
                Ok(())
            }
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let db = Db::connect(&config.database.url).await?;
    db.migrate().await?;

    let listen_addr = config.listen_addr.clone();
    let app = crate::create_app(db, config);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(%listen_addr, "opsdesk listening");
    axum::serve(listener, app).await?;
    Ok(())
}
