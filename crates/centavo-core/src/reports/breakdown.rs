//! Category breakdown builder
//!
//! Turns grouped expense rows into ranked breakdown entries with a
//! percentage-of-total share and, when a budget map for the period is
//! supplied, a budget status per category.

use std::collections::HashMap;

use crate::db::CategoryTotal;
use crate::models::{BudgetStatus, CategoryBreakdownEntry};

use super::round2;

/// Format a share of the grand total as a 2-decimal percentage string.
/// Returns `"0%"` when the grand total is zero.
fn format_percentage(part: f64, grand_total: f64) -> String {
    if grand_total == 0.0 {
        return "0%".to_string();
    }
    format!("{:.2}%", part / grand_total * 100.0)
}

/// Build breakdown entries from grouped expense rows.
///
/// The rows keep their incoming order (the gateway sorts descending by
/// total). `budgets` maps category id to the budgeted amount for the period;
/// pass `None` when the requested range is not a single budgetable month and
/// the budget fields are omitted entirely.
pub fn build_breakdown(
    rows: Vec<CategoryTotal>,
    budgets: Option<&HashMap<i64, f64>>,
) -> Vec<CategoryBreakdownEntry> {
    let grand_total: f64 = rows.iter().map(|r| r.total_spent).sum();

    rows.into_iter()
        .map(|row| {
            let total_spent = round2(row.total_spent);
            let (budget_status, budget_amount, budget_remaining) = match budgets {
                Some(map) => match map.get(&row.category_id) {
                    Some(&amount) => {
                        let status = if total_spent > amount {
                            BudgetStatus::OverBudget
                        } else {
                            BudgetStatus::WithinBudget
                        };
                        (Some(status), Some(amount), Some(round2(amount - total_spent)))
                    }
                    None => (Some(BudgetStatus::NoBudget), None, None),
                },
                None => (None, None, None),
            };

            CategoryBreakdownEntry {
                category_id: row.category_id,
                category_name: row.category_name,
                total_spent,
                percentage_of_total: format_percentage(row.total_spent, grand_total),
                budget_status,
                budget_amount,
                budget_remaining,
            }
        })
        .collect()
}
