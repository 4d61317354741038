//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use centavo_core::dates::FixedClock;
use centavo_core::db::Database;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn seeded_db() -> Database {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO users (id, name, email) VALUES (1, 'Ana', 'ana@example.com')",
        [],
    )
    .unwrap();
    for (id, name) in [(1, "Food"), (2, "Transport"), (3, "Rent")] {
        conn.execute(
            "INSERT INTO categories (id, name) VALUES (?1, ?2)",
            rusqlite::params![id, name],
        )
        .unwrap();
    }
    db
}

fn insert_record(db: &Database, kind: &str, category_id: Option<i64>, amount: f64, occurred_at: &str) {
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO transactions (user_id, type_id, category_id, amount, occurred_at) \
         SELECT 1, id, ?2, ?3, ?4 FROM transaction_types WHERE name = ?1",
        rusqlite::params![kind, category_id, amount, occurred_at],
    )
    .unwrap();
}

fn setup_test_app() -> (Router, Database) {
    let db = seeded_db();
    let app = create_router(db.clone(), None, ServerConfig::default());
    (app, db)
}

/// App with "today" pinned to 2025-03-10 for now-relative reports
fn setup_pinned_app() -> (Router, Database) {
    let db = seeded_db();
    let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
    let app = create_router_with_clock(db.clone(), None, ServerConfig::default(), clock);
    (app, db)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let (app, _db) = setup_test_app();
    let (status, json) = get_json(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

// ========== Balance ==========

#[tokio::test]
async fn test_balance_report() {
    let (app, db) = setup_test_app();
    insert_record(&db, "income", None, 1000.0, "2025-01-10T09:00:00.000Z");
    insert_record(&db, "expense", Some(1), 400.0, "2025-01-15T12:00:00.000Z");

    let (status, json) = get_json(app, "/api/reports/balance?user_id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_ingresos"], 1000.0);
    assert_eq!(json["total_gastos"], 400.0);
    assert_eq!(json["balance"], 600.0);
    assert_eq!(json["user_id"], 1);
}

#[tokio::test]
async fn test_balance_requires_user_id() {
    let (app, _db) = setup_test_app();
    let (status, json) = get_json(app, "/api/reports/balance").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "user_id is required");
}

#[tokio::test]
async fn test_balance_rejects_bad_dates() {
    let (app, _db) = setup_test_app();
    let (status, json) =
        get_json(app, "/api/reports/balance?user_id=1&from_date=not-a-date").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("from_date"));
}

#[tokio::test]
async fn test_balance_rejects_inverted_range() {
    let (app, _db) = setup_test_app();
    let (status, _json) = get_json(
        app,
        "/api/reports/balance?user_id=1&from_date=2025-02-02&to_date=2025-02-01",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Expenses by category ==========

#[tokio::test]
async fn test_expenses_by_category() {
    let (app, db) = setup_test_app();
    insert_record(&db, "expense", Some(1), 300.0, "2025-01-05T10:00:00.000Z");
    insert_record(&db, "expense", Some(2), 100.0, "2025-01-06T10:00:00.000Z");

    let (status, json) = get_json(app, "/api/reports/expenses-by-category?user_id=1").await;
    assert_eq!(status, StatusCode::OK);

    let entries = json["expenses_by_category"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["category_name"], "Food");
    assert_eq!(entries[0]["total_spent"], 300.0);
    assert_eq!(entries[0]["percentage_of_total"], "75.00%");
    // No month filter, so budget fields stay out of the body entirely.
    assert!(entries[0].get("budget_status").is_none());
}

#[tokio::test]
async fn test_expenses_by_category_budget_enrichment() {
    let (app, db) = setup_test_app();
    insert_record(&db, "expense", Some(1), 300.0, "2025-01-05T10:00:00.000Z");
    db.conn()
        .unwrap()
        .execute(
            "INSERT INTO budgets (user_id, category_id, year, month, total_amount) \
             VALUES (1, 1, 2025, 1, 250.0)",
            [],
        )
        .unwrap();

    let (status, json) = get_json(
        app,
        "/api/reports/expenses-by-category?user_id=1&year=2025&month=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let food = &json["expenses_by_category"][0];
    assert_eq!(food["budget_status"], "over_budget");
    assert_eq!(food["budget_amount"], 250.0);
    assert_eq!(food["budget_remaining"], -50.0);
}

// ========== Monthly expenses ==========

#[tokio::test]
async fn test_monthly_expenses_for_year() {
    let (app, db) = setup_test_app();
    insert_record(&db, "expense", Some(1), 100.0, "2024-03-10T10:00:00.000Z");
    insert_record(&db, "expense", Some(1), 60.0, "2024-07-10T10:00:00.000Z");
    insert_record(&db, "income", None, 999.0, "2024-05-10T10:00:00.000Z");

    let (status, json) = get_json(app, "/api/reports/monthly-expenses?user_id=1&year=2024").await;
    assert_eq!(status, StatusCode::OK);

    let months = json["monthly_expenses"].as_array().unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["year_month"], "2024-03");
    assert_eq!(months[1]["year_month"], "2024-07");
}

// ========== Periodic balance ==========

#[tokio::test]
async fn test_periodic_balance_monthly() {
    let (app, db) = setup_test_app();
    insert_record(&db, "income", None, 500.0, "2025-01-10T10:00:00.000Z");
    insert_record(&db, "expense", Some(1), 200.0, "2025-03-10T10:00:00.000Z");

    let (status, json) = get_json(
        app,
        "/api/reports/periodic-balance?user_id=1&from_date=2025-01-01&to_date=2025-12-31",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["period_type"], "monthly");

    let buckets = json["periodic_balance"].as_array().unwrap();
    // Sparse: January and March only.
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["period_label"], "2025-01");
    assert_eq!(buckets[0]["balance"], 500.0);
    assert_eq!(buckets[1]["period_label"], "2025-03");
    assert_eq!(buckets[1]["balance"], -200.0);
}

#[tokio::test]
async fn test_periodic_balance_rejects_invalid_period_type() {
    let (app, _db) = setup_test_app();
    let (status, json) = get_json(
        app,
        "/api/reports/periodic-balance?user_id=1&period_type=daily&from_date=2025-01-01&to_date=2025-02-01",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("period_type"));
}

#[tokio::test]
async fn test_periodic_balance_requires_both_bounds() {
    let (app, _db) = setup_test_app();
    let (status, _json) = get_json(
        app,
        "/api/reports/periodic-balance?user_id=1&from_date=2025-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Top categories ==========

#[tokio::test]
async fn test_top_categories_limit() {
    let (app, db) = setup_test_app();
    insert_record(&db, "expense", Some(1), 300.0, "2025-01-10T10:00:00.000Z");
    insert_record(&db, "expense", Some(2), 200.0, "2025-01-10T10:00:00.000Z");
    insert_record(&db, "expense", Some(3), 100.0, "2025-01-10T10:00:00.000Z");

    let (status, json) = get_json(app, "/api/reports/top-categories?user_id=1&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["limit"], 2);

    let top = json["top_categories"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["category_name"], "Food");
    // Percentage is still relative to all categories, not just the slice.
    assert_eq!(top[0]["percentage_of_total"], "50.00%");
}

#[tokio::test]
async fn test_top_categories_rejects_non_positive_limit() {
    let (app, _db) = setup_test_app();
    let (status, _json) = get_json(app, "/api/reports/top-categories?user_id=1&limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Spending patterns ==========

#[tokio::test]
async fn test_spending_patterns() {
    let (app, db) = setup_test_app();
    insert_record(&db, "expense", Some(1), 100.0, "2025-01-10T10:00:00.000Z");
    insert_record(&db, "expense", Some(2), 500.0, "2025-01-11T10:00:00.000Z");
    insert_record(&db, "expense", Some(1), 130.0, "2025-02-10T10:00:00.000Z");
    insert_record(&db, "expense", Some(2), 100.0, "2025-02-11T10:00:00.000Z");

    let (status, json) = get_json(
        app,
        "/api/reports/spending-patterns?user_id=1\
         &period1_from_date=2025-01-01&period1_to_date=2025-01-31\
         &period2_from_date=2025-02-01&period2_to_date=2025-02-28",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let patterns = json["spending_patterns"].as_array().unwrap();
    assert_eq!(patterns[0]["category_name"], "Transport");
    assert_eq!(patterns[0]["change_amount"], -400.0);
    assert_eq!(patterns[0]["change_percentage"], -80.0);
    assert_eq!(patterns[1]["category_name"], "Food");
    assert_eq!(patterns[1]["change_amount"], 30.0);
}

#[tokio::test]
async fn test_spending_patterns_require_all_dates() {
    let (app, _db) = setup_test_app();
    let (status, _json) = get_json(
        app,
        "/api/reports/spending-patterns?user_id=1&period1_from_date=2025-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Forecast ==========

#[tokio::test]
async fn test_forecast_with_pinned_clock() {
    let (app, db) = setup_pinned_app();
    // Active in two of the three history months (Dec 2024 - Feb 2025).
    insert_record(&db, "expense", Some(1), 100.0, "2025-01-15T10:00:00.000Z");
    insert_record(&db, "expense", Some(1), 50.0, "2025-02-15T10:00:00.000Z");
    // Current partial month must not enter the window.
    insert_record(&db, "expense", Some(1), 9999.0, "2025-03-05T10:00:00.000Z");

    let (status, json) = get_json(app, "/api/reports/forecast?user_id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["history_months_used"], 3);
    assert_eq!(json["from_date"], "2024-12-01T00:00:00.000Z");
    assert_eq!(json["to_date"], "2025-02-28T23:59:59.999Z");

    let forecast = json["forecasted_expenses_by_category"].as_array().unwrap();
    assert_eq!(forecast.len(), 1);
    assert_eq!(forecast[0]["average_monthly_spending"], 75.0);
    assert_eq!(json["total_forecasted_spending"], 75.0);
}

#[tokio::test]
async fn test_forecast_rejects_non_positive_history() {
    let (app, _db) = setup_test_app();
    let (status, _json) = get_json(app, "/api/reports/forecast?user_id=1&history_months=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Error sanitization ==========

#[tokio::test]
async fn test_invalid_user_id_is_a_400() {
    let (app, _db) = setup_test_app();
    let (status, json) = get_json(app, "/api/reports/balance?user_id=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "user_id must be a positive integer");
}
