//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// EnergyAI - Household energy consumption tracker
#[derive(Parser)]
#[command(name = "energyai")]
#[command(about = "Track household energy predictions and get consumption alerts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "energyai.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show database status and collaborator health
    Status,

    /// List recent predictions
    Predictions {
        /// Number of predictions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Run analytics over recent predictions
    Analyze {
        /// Restrict to one user's predictions
        #[arg(short, long)]
        user: Option<i64>,

        /// Number of recent predictions to analyze
        #[arg(short, long, default_value = "30")]
        limit: usize,
    },

    /// Export predictions as CSV
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of predictions to export
        #[arg(short, long, default_value = "1000")]
        limit: usize,
    },
}
