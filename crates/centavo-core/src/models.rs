//! Data models for the ledger and the report API
//!
//! Monetary fields are `f64` rounded to 2 decimals before they reach a
//! response struct, matching the wire contract of the report endpoints.

use serde::{Deserialize, Serialize};

/// The two kinds of ledger movement.
///
/// The record store keeps kinds in a `transaction_types` lookup table; the
/// numeric ids are resolved once when the database is opened and never
/// guessed per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Report bucketing granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Monthly,
    Weekly,
    Yearly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!(
                "Invalid period_type: {} (valid: monthly, weekly, yearly)",
                s
            )),
        }
    }
}

/// How spending compares against a configured budget for the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    WithinBudget,
    OverBudget,
    NoBudget,
}

/// One category's share of expense spending over a date range.
///
/// Budget fields are only populated when the requested range is a single
/// calendar month, where budgets are defined; `budget_remaining` is omitted
/// entirely when no budget exists for the category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdownEntry {
    pub category_id: i64,
    pub category_name: String,
    pub total_spent: f64,
    /// Share of the grand total, formatted to 2 decimals with a trailing `%`
    /// (`"0%"` when the grand total is zero)
    pub percentage_of_total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_status: Option<BudgetStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_remaining: Option<f64>,
}

/// Income, expenses, and derived balance for one calendar bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// `YYYY-MM`, `YYYY-Www`, or `YYYY` depending on granularity
    pub period_label: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
}

/// Per-category delta between two comparison periods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingPattern {
    pub category_id: i64,
    pub category_name: String,
    pub period1_spent: f64,
    pub period2_spent: f64,
    /// `period2_spent - period1_spent`
    pub change_amount: f64,
    /// 0 when both periods are zero, 100 when only period1 is zero,
    /// otherwise `change_amount / period1_spent * 100`
    pub change_percentage: f64,
}

/// Projected monthly spend for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub category_id: i64,
    pub category_name: String,
    /// Historical total divided by the number of distinct months in which the
    /// category actually had records, never by the full window length
    pub average_monthly_spending: f64,
}

/// One expense total per month, `YYYY-MM` labeled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyExpense {
    pub year_month: String,
    pub total_spent: f64,
}

// ============================================================================
// Report responses (wire contract of the /reports endpoints)
// ============================================================================

/// GET /reports/balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub user_id: i64,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub total_ingresos: f64,
    pub total_gastos: f64,
    pub balance: f64,
}

/// GET /reports/expenses-by-category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpensesByCategoryReport {
    pub user_id: i64,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub expenses_by_category: Vec<CategoryBreakdownEntry>,
}

/// GET /reports/monthly-expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyExpensesReport {
    pub user_id: i64,
    pub from_date: String,
    pub to_date: String,
    pub monthly_expenses: Vec<MonthlyExpense>,
}

/// GET /reports/periodic-balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicBalanceReport {
    pub user_id: i64,
    pub period_type: Granularity,
    pub from_date: String,
    pub to_date: String,
    pub periodic_balance: Vec<PeriodBucket>,
}

/// GET /reports/top-categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopCategoriesReport {
    pub user_id: i64,
    pub limit: i64,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub top_categories: Vec<CategoryBreakdownEntry>,
}

/// A resolved comparison period as echoed back in report responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from_date: String,
    pub to_date: String,
}

/// GET /reports/spending-patterns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingPatternsReport {
    pub user_id: i64,
    pub period1: ReportPeriod,
    pub period2: ReportPeriod,
    pub spending_patterns: Vec<SpendingPattern>,
}

/// GET /reports/forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub user_id: i64,
    pub history_months_used: i64,
    /// History window the averages were computed over (current partial month
    /// excluded)
    pub from_date: String,
    pub to_date: String,
    pub forecasted_expenses_by_category: Vec<ForecastEntry>,
    pub total_forecasted_spending: f64,
}
