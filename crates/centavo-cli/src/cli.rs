//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Centavo - Personal finance reporting and forecasting
#[derive(Parser)]
#[command(name = "centavo")]
#[command(about = "Financial reporting and forecasting over a transaction store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "centavo.db", global = true)]
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
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },

    /// Income, expenses, and net balance for a user
    Balance {
        /// User to report on
        #[arg(short, long)]
        user_id: i64,

        /// Range start (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: Option<String>,

        /// Range end (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        to: Option<String>,
    },

    /// Expense breakdown by category
    Categories {
        /// User to report on
        #[arg(short, long)]
        user_id: i64,

        /// Range start (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: Option<String>,

        /// Range end (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        to: Option<String>,

        /// Report year (with --month, enables budget comparison)
        #[arg(long)]
        year: Option<i32>,

        /// Report month, 1-12 (requires --year)
        #[arg(long)]
        month: Option<u32>,
    },

    /// Forecast next month's spending from historical averages
    Forecast {
        /// User to report on
        #[arg(short, long)]
        user_id: i64,

        /// Trailing months of history to average over
        #[arg(long)]
        history_months: Option<i64>,
    },
}
