//! Read-only aggregate queries over the ledger
//!
//! These four query shapes (plus the budget lookup) are everything the
//! report engine needs from the record store. Every query is parameterized,
//! filtered by user and an optional date range, and tolerates zero matching
//! rows by returning empty collections or zero totals.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rusqlite::ToSql;

use super::Database;
use crate::dates::{fmt_timestamp, DateRange};
use crate::error::Result;
use crate::models::{Granularity, MonthlyExpense, TransactionKind};

/// One category's expense total over a range, pre-sorted descending
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_id: i64,
    pub category_name: String,
    pub total_spent: f64,
}

/// One category's expense total within a single `YYYY-MM` month
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMonthTotal {
    pub category_id: i64,
    pub category_name: String,
    pub year_month: String,
    pub total_spent: f64,
}

/// Income and expense totals for one calendar period label
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotals {
    pub label: String,
    pub income_total: f64,
    pub expense_total: f64,
}

/// Append `occurred_at` bound clauses for an optional date range
fn push_range_filter(
    sql: &mut String,
    params: &mut Vec<Box<dyn ToSql>>,
    range: &DateRange,
    alias: &str,
) {
    if let Some(from) = range.from {
        sql.push_str(&format!(" AND {}.occurred_at >= ?", alias));
        params.push(Box::new(fmt_timestamp(from)));
    }
    if let Some(to) = range.to {
        sql.push_str(&format!(" AND {}.occurred_at <= ?", alias));
        params.push(Box::new(fmt_timestamp(to)));
    }
}

impl Database {
    /// Total income and total expenses for a user over a range.
    /// Returns `(income_total, expense_total)`, zero when nothing matches.
    pub fn sum_by_kind(&self, user_id: i64, range: &DateRange) -> Result<(f64, f64)> {
        let conn = self.conn()?;

        let mut sql = String::from(
            "SELECT \
                COALESCE(SUM(CASE WHEN t.type_id = ? THEN t.amount ELSE 0 END), 0), \
                COALESCE(SUM(CASE WHEN t.type_id = ? THEN t.amount ELSE 0 END), 0) \
             FROM transactions t \
             WHERE t.user_id = ?",
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![
            Box::new(self.kind_id(TransactionKind::Income)),
            Box::new(self.kind_id(TransactionKind::Expense)),
            Box::new(user_id),
        ];
        push_range_filter(&mut sql, &mut params, range, "t");

        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let totals = conn.query_row(&sql, param_refs.as_slice(), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;

        Ok(totals)
    }

    /// Expense totals grouped by category, sorted descending by total
    pub fn expense_totals_by_category(
        &self,
        user_id: i64,
        range: &DateRange,
    ) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;

        let mut sql = String::from(
            "SELECT c.id, c.name, COALESCE(SUM(t.amount), 0) AS total_spent \
             FROM transactions t \
             JOIN categories c ON t.category_id = c.id \
             WHERE t.user_id = ? AND t.type_id = ?",
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![
            Box::new(user_id),
            Box::new(self.kind_id(TransactionKind::Expense)),
        ];
        push_range_filter(&mut sql, &mut params, range, "t");
        sql.push_str(" GROUP BY c.id, c.name ORDER BY total_spent DESC, c.name ASC");

        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok(CategoryTotal {
                    category_id: row.get(0)?,
                    category_name: row.get(1)?,
                    total_spent: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Expense totals grouped by category and `YYYY-MM` month, for the
    /// forecast's distinct-month averaging
    pub fn expense_totals_by_category_and_month(
        &self,
        user_id: i64,
        range: &DateRange,
    ) -> Result<Vec<CategoryMonthTotal>> {
        let conn = self.conn()?;

        let mut sql = String::from(
            "SELECT c.id, c.name, strftime('%Y-%m', t.occurred_at) AS year_month, \
                    COALESCE(SUM(t.amount), 0) AS total_spent \
             FROM transactions t \
             JOIN categories c ON t.category_id = c.id \
             WHERE t.user_id = ? AND t.type_id = ?",
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![
            Box::new(user_id),
            Box::new(self.kind_id(TransactionKind::Expense)),
        ];
        push_range_filter(&mut sql, &mut params, range, "t");
        sql.push_str(" GROUP BY c.id, c.name, year_month ORDER BY year_month ASC, c.name ASC");

        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok(CategoryMonthTotal {
                    category_id: row.get(0)?,
                    category_name: row.get(1)?,
                    year_month: row.get(2)?,
                    total_spent: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Income and expense totals per calendar period label.
    ///
    /// Monthly and yearly labels come straight from SQL `strftime`. Weekly
    /// totals are aggregated per day in SQL and folded into ISO week labels
    /// with chrono, so weeks spanning a year boundary land in the correct
    /// ISO year (`2024-12-30` belongs to `2025-W01`).
    pub fn totals_by_period(
        &self,
        user_id: i64,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<Vec<PeriodTotals>> {
        let label_expr = match granularity {
            Granularity::Monthly => "strftime('%Y-%m', t.occurred_at)",
            Granularity::Yearly => "strftime('%Y', t.occurred_at)",
            Granularity::Weekly => "date(t.occurred_at)",
        };

        let conn = self.conn()?;
        let mut sql = format!(
            "SELECT {} AS period_label, \
                COALESCE(SUM(CASE WHEN t.type_id = ? THEN t.amount ELSE 0 END), 0), \
                COALESCE(SUM(CASE WHEN t.type_id = ? THEN t.amount ELSE 0 END), 0) \
             FROM transactions t \
             WHERE t.user_id = ?",
            label_expr
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![
            Box::new(self.kind_id(TransactionKind::Income)),
            Box::new(self.kind_id(TransactionKind::Expense)),
            Box::new(user_id),
        ];
        push_range_filter(&mut sql, &mut params, range, "t");
        sql.push_str(" GROUP BY period_label ORDER BY period_label ASC");

        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok(PeriodTotals {
                    label: row.get(0)?,
                    income_total: row.get(1)?,
                    expense_total: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match granularity {
            Granularity::Weekly => Ok(fold_days_into_iso_weeks(rows)),
            _ => Ok(rows),
        }
    }

    /// Expense totals per `YYYY-MM` month (expense records only; months with
    /// income but no expenses do not appear)
    pub fn monthly_expense_totals(
        &self,
        user_id: i64,
        range: &DateRange,
    ) -> Result<Vec<MonthlyExpense>> {
        let conn = self.conn()?;

        let mut sql = String::from(
            "SELECT strftime('%Y-%m', t.occurred_at) AS year_month, \
                    COALESCE(SUM(t.amount), 0) AS total_spent \
             FROM transactions t \
             WHERE t.user_id = ? AND t.type_id = ?",
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![
            Box::new(user_id),
            Box::new(self.kind_id(TransactionKind::Expense)),
        ];
        push_range_filter(&mut sql, &mut params, range, "t");
        sql.push_str(" GROUP BY year_month ORDER BY year_month ASC");

        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok(MonthlyExpense {
                    year_month: row.get(0)?,
                    total_spent: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Budget amounts per category for one user and calendar month
    pub fn monthly_budgets(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<HashMap<i64, f64>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT category_id, total_amount FROM budgets \
             WHERE user_id = ?1 AND year = ?2 AND month = ?3",
        )?;
        let rows = stmt
            .query_map(
                rusqlite::params![user_id, year, month],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)),
            )?
            .collect::<std::result::Result<HashMap<_, _>, _>>()?;

        Ok(rows)
    }
}

/// Fold day-level totals into ISO week buckets (`YYYY-Www`), ascending
fn fold_days_into_iso_weeks(days: Vec<PeriodTotals>) -> Vec<PeriodTotals> {
    let mut weeks: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for day in days {
        // The day label comes from SQL date(), always YYYY-MM-DD
        let label = match NaiveDate::parse_from_str(&day.label, "%Y-%m-%d") {
            Ok(date) => {
                let iso = date.iso_week();
                format!("{}-W{:02}", iso.year(), iso.week())
            }
            Err(_) => day.label.clone(),
        };
        let entry = weeks.entry(label).or_insert((0.0, 0.0));
        entry.0 += day.income_total;
        entry.1 += day.expense_total;
    }

    weeks
        .into_iter()
        .map(|(label, (income_total, expense_total))| PeriodTotals {
            label,
            income_total,
            expense_total,
        })
        .collect()
}
