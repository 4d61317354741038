//! Centavo Core Library
//!
//! Shared functionality for the Centavo personal finance reporting engine:
//! - Record store access (read-only aggregate queries over the ledger)
//! - Date range resolution and calendar window helpers
//! - Category breakdowns, periodic bucketing, pattern comparison, and
//!   historical-average forecasting
//! - The orchestrating report service consumed by the API server and CLI

pub mod dates;
pub mod db;
pub mod error;
pub mod models;
pub mod reports;

pub use dates::{Clock, DateRange, FixedClock, SystemClock};
pub use db::Database;
pub use error::{Error, Result};
pub use reports::ReportService;
