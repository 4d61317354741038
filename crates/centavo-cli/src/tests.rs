//! CLI command tests

use centavo_core::db::Database;
use centavo_core::models::TransactionKind;

use crate::commands;

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO users (id, name, email) VALUES (1, 'Ana', 'ana@example.com')",
        [],
    )
    .unwrap();
    conn.execute("INSERT INTO categories (id, name) VALUES (1, 'Food')", [])
        .unwrap();
    db
}

fn insert_record(db: &Database, kind: TransactionKind, amount: f64, occurred_at: &str) {
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO transactions (user_id, type_id, category_id, amount, occurred_at) \
         VALUES (1, ?1, 1, ?2, ?3)",
        rusqlite::params![db.kind_id(kind), amount, occurred_at],
    )
    .unwrap();
}

#[test]
fn test_cmd_balance() {
    let db = setup_test_db();
    insert_record(&db, TransactionKind::Income, 1000.0, "2025-01-10T09:00:00.000Z");
    insert_record(&db, TransactionKind::Expense, 400.0, "2025-01-15T12:00:00.000Z");

    let result = commands::cmd_balance(&db, 1, None, None);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_balance_rejects_bad_user() {
    let db = setup_test_db();
    let result = commands::cmd_balance(&db, 0, None, None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_categories() {
    let db = setup_test_db();
    insert_record(&db, TransactionKind::Expense, 300.0, "2025-01-05T10:00:00.000Z");

    let result = commands::cmd_categories(&db, 1, None, None, None, None);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_forecast() {
    let db = setup_test_db();
    insert_record(&db, TransactionKind::Expense, 100.0, "2025-01-15T10:00:00.000Z");

    let result = commands::cmd_forecast(&db, 1, Some(3));
    assert!(result.is_ok());
}
