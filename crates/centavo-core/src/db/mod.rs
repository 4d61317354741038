//! Record store access layer with connection pooling and migrations
//!
//! This module is organized by concern:
//! - `reports` - the read-only aggregate queries the report engine runs
//!
//! The report engine never writes through this layer; mutation of ledger
//! records, categories, users, and budgets happens in the surrounding CRUD
//! system and is out of scope here.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::TransactionKind;

mod reports;

pub use reports::{CategoryMonthTotal, CategoryTotal, PeriodTotals};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Numeric ids of the two transaction kinds, resolved once at startup from
/// the `transaction_types` lookup table rather than hard-coded per query.
#[derive(Debug, Clone, Copy)]
pub struct KindIds {
    pub income: i64,
    pub expense: i64,
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    kinds: KindIds,
}

impl Database {
    /// Open (or create) a database file, run migrations, and resolve the
    /// transaction kind ids.
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        run_migrations(&pool)?;
        let kinds = resolve_kind_ids(&pool)?;

        Ok(Self { pool, kinds })
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every
    /// pooled connection would otherwise see its own private in-memory
    /// database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/centavo_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        // Remove any stale file from a previous run
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Numeric id of a transaction kind in the record store
    pub fn kind_id(&self, kind: TransactionKind) -> i64 {
        match kind {
            TransactionKind::Income => self.kinds.income,
            TransactionKind::Expense => self.kinds.expense,
        }
    }
}

/// Run idempotent schema migrations
fn run_migrations(pool: &DbPool) -> Result<()> {
    let conn = pool.get()?;

    conn.execute_batch(
        r#"
        -- Enable foreign keys
        PRAGMA foreign_keys = ON;

        -- WAL mode: readers don't block writers
        PRAGMA journal_mode = WAL;

        -- Synchronous NORMAL: safe for most power-loss scenarios, faster than FULL
        PRAGMA synchronous = NORMAL;

        -- Users (owners of ledger records)
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Transaction kind lookup table (income / expense)
        CREATE TABLE IF NOT EXISTS transaction_types (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        INSERT OR IGNORE INTO transaction_types (name) VALUES ('income'), ('expense');

        -- Spending categories
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- The ledger: dated, typed, categorized money movements.
        -- occurred_at is stored as an ISO-8601 UTC string
        -- (YYYY-MM-DDTHH:MM:SS.SSSZ) so range filters compare lexicographically.
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id),
            type_id INTEGER NOT NULL REFERENCES transaction_types(id),
            category_id INTEGER REFERENCES categories(id),
            amount REAL NOT NULL CHECK (amount >= 0),
            description TEXT,
            occurred_at TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_user_date
            ON transactions(user_id, occurred_at);
        CREATE INDEX IF NOT EXISTS idx_transactions_category
            ON transactions(category_id);

        -- Per-category monthly budgets
        CREATE TABLE IF NOT EXISTS budgets (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id),
            category_id INTEGER NOT NULL REFERENCES categories(id),
            year INTEGER NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            total_amount REAL NOT NULL CHECK (total_amount >= 0),
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (user_id, category_id, year, month)
        );
        "#,
    )?;

    info!("Database migrations complete");
    Ok(())
}

/// Resolve the income/expense type ids from the lookup table
fn resolve_kind_ids(pool: &DbPool) -> Result<KindIds> {
    let conn = pool.get()?;
    let mut lookup = |name: &str| -> Result<i64> {
        conn.query_row(
            "SELECT id FROM transaction_types WHERE name = ?1",
            [name],
            |row| row.get(0),
        )
        .map_err(Error::from)
    };

    Ok(KindIds {
        income: lookup(TransactionKind::Income.as_str())?,
        expense: lookup(TransactionKind::Expense.as_str())?,
    })
}
