//! The report engine: pure aggregation/shaping logic plus the orchestrating
//! service
//!
//! - `breakdown` - ranked per-category expense breakdowns
//! - `patterns` - period-over-period spending comparison
//! - `forecast` - trailing-window historical-average forecast
//! - `service` - validation, gateway calls, and response shaping

pub mod breakdown;
pub mod forecast;
pub mod patterns;
pub mod service;

pub use service::ReportService;

/// Round a monetary value to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
