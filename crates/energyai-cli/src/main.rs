//! EnergyAI CLI - Household energy consumption tracker
//!
//! Usage:
//!   energyai init                Initialize database
//!   energyai serve --port 3001   Start web server
//!   energyai predictions         List recent predictions
//!   energyai analyze             Run analytics over recent predictions
//!   energyai export -o out.csv   Export predictions as CSV

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref()).await,
        Commands::Status => commands::cmd_status(&cli.db).await,
        Commands::Predictions { limit } => commands::cmd_predictions(&cli.db, limit),
        Commands::Analyze { user, limit } => commands::cmd_analyze(&cli.db, user, limit).await,
        Commands::Export { output, limit } => {
            commands::cmd_export(&cli.db, output.as_deref(), limit)
        }
    }
}
