use std::path::PathBuf;

use axum::extract::FromRef;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod controllers;
mod db;
mod error;
mod models;
mod pages;
mod types;

use config::Config;
use db::Database;
pub(crate) use error::{ApiError, ApiResult};

#[derive(Parser)]
#[command(name = "pastedump", version, about = "A minimal pastebin server.")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server.
    Serve,
    /// Delete every paste past its expiration time, then exit.
    PurgeExpired,
}

#[derive(Clone, FromRef)]
pub(crate) struct App {
    pub config: Config,
    pub database: Database,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let database = Database::open(&config.database.path).await?;

    let app = App { config, database };

    match cli.command {
        Command::Serve => commands::serve::run(app).await,
        Command::PurgeExpired => commands::purge_expired::run(app).await,
    }
}
