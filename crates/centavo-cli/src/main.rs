//! Centavo CLI - Personal finance reporting and forecasting
//!
//! Usage:
//!   centavo init                  Initialize database
//!   centavo serve --port 3000     Start web server
//!   centavo balance -u 1          Print a balance report
//!   centavo forecast -u 1         Print a spending forecast

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
            allowed_origins,
        } => {
            commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref(), allowed_origins).await
        }
        Commands::Balance { user_id, from, to } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_balance(&db, user_id, from.as_deref(), to.as_deref())
        }
        Commands::Categories {
            user_id,
            from,
            to,
            year,
            month,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_categories(&db, user_id, from.as_deref(), to.as_deref(), year, month)
        }
        Commands::Forecast {
            user_id,
            history_months,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_forecast(&db, user_id, history_months)
        }
    }
}
