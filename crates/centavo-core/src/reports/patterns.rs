//! Spending pattern comparator
//!
//! Diffs two independent per-category breakdowns and surfaces the largest
//! behavioral swings first. Categories are matched by id; the name is kept
//! purely for display, so two same-named categories never merge silently.

use std::collections::BTreeMap;

use crate::db::CategoryTotal;
use crate::models::SpendingPattern;

use super::round2;

/// Compare two disjoint periods' expense breakdowns.
///
/// Emits one pattern per category seen in either period, sorted descending
/// by absolute change so the most significant shifts come first.
pub fn compare_periods(period1: &[CategoryTotal], period2: &[CategoryTotal]) -> Vec<SpendingPattern> {
    // category id -> (name, period1 total, period2 total)
    let mut merged: BTreeMap<i64, (String, f64, f64)> = BTreeMap::new();

    for row in period1 {
        merged
            .entry(row.category_id)
            .or_insert_with(|| (row.category_name.clone(), 0.0, 0.0))
            .1 = row.total_spent;
    }
    for row in period2 {
        merged
            .entry(row.category_id)
            .or_insert_with(|| (row.category_name.clone(), 0.0, 0.0))
            .2 = row.total_spent;
    }

    let mut patterns: Vec<SpendingPattern> = merged
        .into_iter()
        .map(|(category_id, (category_name, p1, p2))| {
            let change_amount = p2 - p1;
            let change_percentage = if p1 != 0.0 {
                change_amount / p1 * 100.0
            } else if p2 > 0.0 {
                100.0
            } else {
                0.0
            };
            SpendingPattern {
                category_id,
                category_name,
                period1_spent: round2(p1),
                period2_spent: round2(p2),
                change_amount: round2(change_amount),
                change_percentage: round2(change_percentage),
            }
        })
        .collect();

    // Largest absolute swing first; ties break on name for stable output
    patterns.sort_by(|a, b| {
        b.change_amount
            .abs()
            .partial_cmp(&a.change_amount.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: &str, total: f64) -> CategoryTotal {
        CategoryTotal {
            category_id: id,
            category_name: name.to_string(),
            total_spent: total,
        }
    }

    #[test]
    fn unions_categories_from_both_periods() {
        let p1 = vec![row(1, "Food", 100.0)];
        let p2 = vec![row(2, "Transport", 50.0)];

        let patterns = compare_periods(&p1, &p2);
        assert_eq!(patterns.len(), 2);

        let food = patterns.iter().find(|p| p.category_id == 1).unwrap();
        assert_eq!(food.period1_spent, 100.0);
        assert_eq!(food.period2_spent, 0.0);
        assert_eq!(food.change_amount, -100.0);
        assert_eq!(food.change_percentage, -100.0);

        let transport = patterns.iter().find(|p| p.category_id == 2).unwrap();
        assert_eq!(transport.change_amount, 50.0);
        assert_eq!(transport.change_percentage, 100.0);
    }

    #[test]
    fn matches_by_id_not_by_name() {
        // Same display name, different categories: they must not merge.
        let p1 = vec![row(1, "Food", 100.0)];
        let p2 = vec![row(9, "Food", 40.0)];

        let patterns = compare_periods(&p1, &p2);
        assert_eq!(patterns.len(), 2);
    }

    #[test]
    fn sorts_by_absolute_change_descending() {
        let p1 = vec![row(1, "Food", 100.0), row(2, "Transport", 500.0)];
        let p2 = vec![row(1, "Food", 130.0), row(2, "Transport", 100.0)];

        let patterns = compare_periods(&p1, &p2);
        assert_eq!(patterns[0].category_id, 2); // |-400| beats |30|
        assert_eq!(patterns[1].category_id, 1);
    }

    #[test]
    fn change_percentage_from_nonzero_base() {
        let p1 = vec![row(1, "Food", 200.0)];
        let p2 = vec![row(1, "Food", 250.0)];

        let patterns = compare_periods(&p1, &p2);
        assert_eq!(patterns[0].change_amount, 50.0);
        assert_eq!(patterns[0].change_percentage, 25.0);
    }

    #[test]
    fn swapping_periods_negates_changes() {
        let p1 = vec![row(1, "Food", 100.0), row(2, "Transport", 60.0)];
        let p2 = vec![row(1, "Food", 150.0), row(2, "Transport", 30.0)];

        let forward = compare_periods(&p1, &p2);
        let backward = compare_periods(&p2, &p1);

        for f in &forward {
            let b = backward
                .iter()
                .find(|p| p.category_id == f.category_id)
                .unwrap();
            assert_eq!(b.change_amount, -f.change_amount);
            assert_eq!(
                b.change_percentage.signum() * f.change_percentage.signum(),
                -1.0
            );
        }
    }

    #[test]
    fn zero_in_both_periods_stays_zero() {
        let p1 = vec![row(1, "Food", 0.0)];
        let p2 = vec![row(1, "Food", 0.0)];

        let patterns = compare_periods(&p1, &p2);
        assert_eq!(patterns[0].change_amount, 0.0);
        assert_eq!(patterns[0].change_percentage, 0.0);
    }
}
