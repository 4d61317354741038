//! Report orchestration
//!
//! Every report is a stateless request-to-response transform over the same
//! linear pipeline: validate inputs, resolve the date range, run the
//! aggregate queries, shape the response. Validation always completes before
//! the first gateway call, and a failure at any step aborts the whole
//! report.

use std::sync::Arc;

use crate::dates::{self, Clock, DateRange, SystemClock};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::*;

use super::{breakdown, forecast, patterns, round2};

/// Default number of top categories returned
const DEFAULT_TOP_LIMIT: i64 = 5;

/// Default trailing window for the forecast, in months
const DEFAULT_HISTORY_MONTHS: i64 = 3;

/// Largest accepted forecast history window (10 years)
const MAX_HISTORY_MONTHS: i64 = 120;

/// The report engine's entry point. Holds the record store handle and a
/// clock; keeps no state between requests.
#[derive(Clone)]
pub struct ReportService {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(db: Database) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    /// Construct with an explicit clock (tests pin a fixed date here)
    pub fn with_clock(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Total income, total expenses, and net balance over an optional range
    pub fn balance_report(
        &self,
        user_id: i64,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<BalanceReport> {
        validate_user_id(user_id)?;
        let range = dates::resolve(from, to)?;

        let (income, expenses) = self.db.sum_by_kind(user_id, &range)?;
        let total_ingresos = round2(income);
        let total_gastos = round2(expenses);

        Ok(BalanceReport {
            user_id,
            from_date: range.from_string(),
            to_date: range.to_string_opt(),
            total_ingresos,
            total_gastos,
            balance: round2(total_ingresos - total_gastos),
        })
    }

    /// Ranked expense breakdown by category. A `year`/`month` pair takes
    /// precedence over explicit bounds and additionally enables budget
    /// enrichment, since budgets are defined per calendar month.
    pub fn expenses_by_category_report(
        &self,
        user_id: i64,
        from: Option<&str>,
        to: Option<&str>,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<ExpensesByCategoryReport> {
        validate_user_id(user_id)?;
        let (range, budget_period) = resolve_breakdown_range(from, to, year, month)?;

        let rows = self.db.expense_totals_by_category(user_id, &range)?;
        let budgets = match budget_period {
            Some((y, m)) => Some(self.db.monthly_budgets(user_id, y, m)?),
            None => None,
        };

        Ok(ExpensesByCategoryReport {
            user_id,
            from_date: range.from_string(),
            to_date: range.to_string_opt(),
            expenses_by_category: breakdown::build_breakdown(rows, budgets.as_ref()),
        })
    }

    /// Expense totals per month, for a given year or (by default) the last
    /// 12 calendar months including the current one
    pub fn monthly_expenses_report(
        &self,
        user_id: i64,
        year: Option<i32>,
    ) -> Result<MonthlyExpensesReport> {
        validate_user_id(user_id)?;
        let range = match year {
            Some(y) => dates::resolve_year(y)?,
            None => dates::trailing_twelve_months(self.clock.today()),
        };
        let (from_date, to_date) = bounded_strings(&range);

        let monthly_expenses = self
            .db
            .monthly_expense_totals(user_id, &range)?
            .into_iter()
            .map(|m| MonthlyExpense {
                year_month: m.year_month,
                total_spent: round2(m.total_spent),
            })
            .collect();

        Ok(MonthlyExpensesReport {
            user_id,
            from_date,
            to_date,
            monthly_expenses,
        })
    }

    /// Income, expenses, and balance per calendar bucket. Both bounds are
    /// mandatory; buckets with no activity inside the range are not
    /// synthesized.
    pub fn periodic_balance_report(
        &self,
        user_id: i64,
        period_type: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<PeriodicBalanceReport> {
        validate_user_id(user_id)?;

        let granularity: Granularity = period_type
            .unwrap_or(Granularity::Monthly.as_str())
            .parse()
            .map_err(Error::Validation)?;

        let range = dates::resolve(from, to)?;
        if !range.is_fully_bounded() {
            return Err(Error::validation(
                "from_date and to_date are required for the periodic balance report",
            ));
        }
        let (from_date, to_date) = bounded_strings(&range);

        let periodic_balance = self
            .db
            .totals_by_period(user_id, &range, granularity)?
            .into_iter()
            .map(|p| {
                let total_income = round2(p.income_total);
                let total_expenses = round2(p.expense_total);
                PeriodBucket {
                    period_label: p.label,
                    total_income,
                    total_expenses,
                    balance: round2(total_income - total_expenses),
                }
            })
            .collect();

        Ok(PeriodicBalanceReport {
            user_id,
            period_type: granularity,
            from_date,
            to_date,
            periodic_balance,
        })
    }

    /// The N categories with the largest expense totals over the range
    pub fn top_categories_report(
        &self,
        user_id: i64,
        limit: Option<i64>,
        from: Option<&str>,
        to: Option<&str>,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<TopCategoriesReport> {
        validate_user_id(user_id)?;
        let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT);
        if limit <= 0 {
            return Err(Error::validation("limit must be a positive integer"));
        }
        let (range, budget_period) = resolve_breakdown_range(from, to, year, month)?;

        let rows = self.db.expense_totals_by_category(user_id, &range)?;
        let budgets = match budget_period {
            Some((y, m)) => Some(self.db.monthly_budgets(user_id, y, m)?),
            None => None,
        };

        // Percentages are computed against the full breakdown, then sliced
        let mut top_categories = breakdown::build_breakdown(rows, budgets.as_ref());
        top_categories.truncate(limit as usize);

        Ok(TopCategoriesReport {
            user_id,
            limit,
            from_date: range.from_string(),
            to_date: range.to_string_opt(),
            top_categories,
        })
    }

    /// Per-category spending deltas between two fully-bounded periods
    pub fn spending_patterns_report(
        &self,
        user_id: i64,
        period1_from: Option<&str>,
        period1_to: Option<&str>,
        period2_from: Option<&str>,
        period2_to: Option<&str>,
    ) -> Result<SpendingPatternsReport> {
        validate_user_id(user_id)?;

        let (Some(p1f), Some(p1t), Some(p2f), Some(p2t)) =
            (period1_from, period1_to, period2_from, period2_to)
        else {
            return Err(Error::validation(
                "All four period dates are required (period1_from_date, period1_to_date, \
                 period2_from_date, period2_to_date)",
            ));
        };

        let range1 = dates::resolve(Some(p1f), Some(p1t))?;
        let range2 = dates::resolve(Some(p2f), Some(p2t))?;

        let expenses1 = self.db.expense_totals_by_category(user_id, &range1)?;
        let expenses2 = self.db.expense_totals_by_category(user_id, &range2)?;

        let (p1_from, p1_to) = bounded_strings(&range1);
        let (p2_from, p2_to) = bounded_strings(&range2);

        Ok(SpendingPatternsReport {
            user_id,
            period1: ReportPeriod {
                from_date: p1_from,
                to_date: p1_to,
            },
            period2: ReportPeriod {
                from_date: p2_from,
                to_date: p2_to,
            },
            spending_patterns: patterns::compare_periods(&expenses1, &expenses2),
        })
    }

    /// Historical-average expense forecast over a trailing window that
    /// excludes the current partial month
    pub fn forecast_report(
        &self,
        user_id: i64,
        history_months: Option<i64>,
    ) -> Result<ForecastReport> {
        validate_user_id(user_id)?;
        let history_months = history_months.unwrap_or(DEFAULT_HISTORY_MONTHS);
        if !(1..=MAX_HISTORY_MONTHS).contains(&history_months) {
            return Err(Error::validation(format!(
                "history_months must be between 1 and {}",
                MAX_HISTORY_MONTHS
            )));
        }

        let window = dates::forecast_window(self.clock.today(), history_months as u32);
        let (from_date, to_date) = bounded_strings(&window);

        let rows = self
            .db
            .expense_totals_by_category_and_month(user_id, &window)?;
        let (forecasted_expenses_by_category, total_forecasted_spending) =
            forecast::average_monthly_spending(&rows);

        Ok(ForecastReport {
            user_id,
            history_months_used: history_months,
            from_date,
            to_date,
            forecasted_expenses_by_category,
            total_forecasted_spending,
        })
    }
}

fn validate_user_id(user_id: i64) -> Result<()> {
    if user_id <= 0 {
        return Err(Error::validation("user_id must be a positive integer"));
    }
    Ok(())
}

/// Resolve a breakdown-style filter: a full `year`/`month` pair wins over
/// explicit bounds and identifies the budget period; otherwise explicit
/// bounds apply and no budget period exists.
///
/// Explicit bounds are parsed up front either way: a malformed `from_date`
/// fails the request even when a `year`/`month` pair would have shadowed it.
fn resolve_breakdown_range(
    from: Option<&str>,
    to: Option<&str>,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<(DateRange, Option<(i32, u32)>)> {
    let explicit = dates::resolve(from, to)?;
    if let (Some(y), Some(m)) = (year, month) {
        let range = dates::resolve_year_month(y, m)?;
        return Ok((range, Some((y, m))));
    }
    Ok((explicit, None))
}

/// Render both bounds of a range known to be fully bounded
fn bounded_strings(range: &DateRange) -> (String, String) {
    (
        range.from_string().unwrap_or_default(),
        range.to_string_opt().unwrap_or_default(),
    )
}
