//! Naive historical-average expense forecast
//!
//! Averages each category's spend over the months it was actually active in
//! within the trailing window, not over the full window length. A category
//! with records in 2 of 3 window months averages over 2.

use std::collections::{BTreeMap, BTreeSet};

use crate::db::CategoryMonthTotal;
use crate::models::ForecastEntry;

use super::round2;

struct CategoryHistory {
    category_name: String,
    total_spent: f64,
    active_months: BTreeSet<String>,
}

/// Compute per-category monthly averages from month-grouped expense rows.
///
/// Returns the entries sorted descending by average, plus the summed total
/// forecasted spending, both rounded to 2 decimals. Categories absent from
/// the window simply do not appear.
pub fn average_monthly_spending(rows: &[CategoryMonthTotal]) -> (Vec<ForecastEntry>, f64) {
    let mut histories: BTreeMap<i64, CategoryHistory> = BTreeMap::new();

    for row in rows {
        let history = histories
            .entry(row.category_id)
            .or_insert_with(|| CategoryHistory {
                category_name: row.category_name.clone(),
                total_spent: 0.0,
                active_months: BTreeSet::new(),
            });
        history.total_spent += row.total_spent;
        history.active_months.insert(row.year_month.clone());
    }

    let mut entries: Vec<ForecastEntry> = histories
        .into_iter()
        .filter(|(_, h)| !h.active_months.is_empty())
        .map(|(category_id, history)| ForecastEntry {
            category_id,
            category_name: history.category_name,
            average_monthly_spending: round2(
                history.total_spent / history.active_months.len() as f64,
            ),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.average_monthly_spending
            .partial_cmp(&a.average_monthly_spending)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });

    let total = round2(entries.iter().map(|e| e.average_monthly_spending).sum());

    (entries, total)
}
