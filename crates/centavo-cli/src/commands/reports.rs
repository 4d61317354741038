//! Report generation commands
//!
//! Each command runs a report through [`ReportService`] and prints the same
//! JSON document the API serves, pretty-printed for the terminal.

use anyhow::{Context, Result};
use centavo_core::db::Database;
use centavo_core::ReportService;
use serde::Serialize;

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

pub fn cmd_balance(db: &Database, user_id: i64, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let svc = ReportService::new(db.clone());
    let report = svc.balance_report(user_id, from, to)?;
    print_report(&report)
}

pub fn cmd_categories(
    db: &Database,
    user_id: i64,
    from: Option<&str>,
    to: Option<&str>,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let svc = ReportService::new(db.clone());
    let report = svc.expenses_by_category_report(user_id, from, to, year, month)?;
    print_report(&report)
}

pub fn cmd_forecast(db: &Database, user_id: i64, history_months: Option<i64>) -> Result<()> {
    let svc = ReportService::new(db.clone());
    let report = svc.forecast_report(user_id, history_months)?;
    print_report(&report)
}
