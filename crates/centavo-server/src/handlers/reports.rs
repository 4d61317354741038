//! Report handlers
//!
//! Each handler validates `user_id` presence, hands raw filter values to the
//! report service (which owns the rest of the validation), and serializes
//! the shaped report.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use centavo_core::models::{
    BalanceReport, ExpensesByCategoryReport, ForecastReport, MonthlyExpensesReport,
    PeriodicBalanceReport, SpendingPatternsReport, TopCategoriesReport,
};

use crate::{AppError, AppState};

fn require_user_id(user_id: Option<i64>) -> Result<i64, AppError> {
    user_id.ok_or_else(|| AppError::bad_request("user_id is required"))
}

/// Query parameters shared by the range-filtered reports
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub user_id: Option<i64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// GET /api/reports/balance - Total income, expenses, and net balance
pub async fn report_balance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BalanceQuery>,
) -> Result<Json<BalanceReport>, AppError> {
    let user_id = require_user_id(params.user_id)?;

    let report = state
        .reports
        .balance_report(user_id, params.from_date.as_deref(), params.to_date.as_deref())
        .map_err(AppError::from_engine)?;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct ExpensesByCategoryQuery {
    pub user_id: Option<i64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    /// Year/month shortcut; takes precedence over explicit bounds when both
    /// are supplied
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// GET /api/reports/expenses-by-category - Ranked expense breakdown
pub async fn report_expenses_by_category(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpensesByCategoryQuery>,
) -> Result<Json<ExpensesByCategoryReport>, AppError> {
    let user_id = require_user_id(params.user_id)?;

    let report = state
        .reports
        .expenses_by_category_report(
            user_id,
            params.from_date.as_deref(),
            params.to_date.as_deref(),
            params.year,
            params.month,
        )
        .map_err(AppError::from_engine)?;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct MonthlyExpensesQuery {
    pub user_id: Option<i64>,
    /// Report year; defaults to the last 12 months including the current one
    pub year: Option<i32>,
}

/// GET /api/reports/monthly-expenses - Expense totals month by month
pub async fn report_monthly_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthlyExpensesQuery>,
) -> Result<Json<MonthlyExpensesReport>, AppError> {
    let user_id = require_user_id(params.user_id)?;

    let report = state
        .reports
        .monthly_expenses_report(user_id, params.year)
        .map_err(AppError::from_engine)?;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct PeriodicBalanceQuery {
    pub user_id: Option<i64>,
    /// monthly (default), weekly, or yearly
    pub period_type: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// GET /api/reports/periodic-balance - Income/expenses/balance per bucket
pub async fn report_periodic_balance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodicBalanceQuery>,
) -> Result<Json<PeriodicBalanceReport>, AppError> {
    let user_id = require_user_id(params.user_id)?;

    let report = state
        .reports
        .periodic_balance_report(
            user_id,
            params.period_type.as_deref(),
            params.from_date.as_deref(),
            params.to_date.as_deref(),
        )
        .map_err(AppError::from_engine)?;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct TopCategoriesQuery {
    pub user_id: Option<i64>,
    /// Number of categories to return (default 5)
    pub limit: Option<i64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// GET /api/reports/top-categories - The N biggest expense categories
pub async fn report_top_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopCategoriesQuery>,
) -> Result<Json<TopCategoriesReport>, AppError> {
    let user_id = require_user_id(params.user_id)?;

    let report = state
        .reports
        .top_categories_report(
            user_id,
            params.limit,
            params.from_date.as_deref(),
            params.to_date.as_deref(),
            params.year,
            params.month,
        )
        .map_err(AppError::from_engine)?;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct SpendingPatternsQuery {
    pub user_id: Option<i64>,
    pub period1_from_date: Option<String>,
    pub period1_to_date: Option<String>,
    pub period2_from_date: Option<String>,
    pub period2_to_date: Option<String>,
}

/// GET /api/reports/spending-patterns - Per-category deltas between two periods
pub async fn report_spending_patterns(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpendingPatternsQuery>,
) -> Result<Json<SpendingPatternsReport>, AppError> {
    let user_id = require_user_id(params.user_id)?;

    let report = state
        .reports
        .spending_patterns_report(
            user_id,
            params.period1_from_date.as_deref(),
            params.period1_to_date.as_deref(),
            params.period2_from_date.as_deref(),
            params.period2_to_date.as_deref(),
        )
        .map_err(AppError::from_engine)?;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub user_id: Option<i64>,
    /// Trailing months of history to average over (default 3)
    pub history_months: Option<i64>,
}

/// GET /api/reports/forecast - Historical-average expense forecast
pub async fn report_forecast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastReport>, AppError> {
    let user_id = require_user_id(params.user_id)?;

    let report = state
        .reports
        .forecast_report(user_id, params.history_months)
        .map_err(AppError::from_engine)?;

    Ok(Json(report))
}
