//! Schema management
//!
//! The single owner of the table definitions. `ensure_schema` creates the
//! `expenses`, `budgets` and `reports` tables when absent, records the schema
//! version, and applies any additive migrations newer than the stored version.
//! Calling it again on an up-to-date database changes nothing.

use log::{debug, info};
use rusqlite::{params, Connection};

use crate::error::LedgerResult;

pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL,
    amount_cents INTEGER NOT NULL,
    description  TEXT NOT NULL CHECK (length(trim(description)) > 0),
    category     TEXT,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(user_id);
CREATE INDEX IF NOT EXISTS idx_expenses_user_category ON expenses(user_id, category);

CREATE TABLE IF NOT EXISTS budgets (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL,
    category     TEXT NOT NULL,
    limit_cents  INTEGER NOT NULL CHECK (limit_cents > 0),
    period       TEXT NOT NULL CHECK (period IN ('daily', 'weekly', 'monthly', 'custom')),
    start_date   TEXT NOT NULL,
    end_date     TEXT NOT NULL,
    CHECK (start_date <= end_date)
);

CREATE INDEX IF NOT EXISTS idx_budgets_user_category ON budgets(user_id, category);

CREATE TABLE IF NOT EXISTS reports (
    report_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER NOT NULL,
    creation_date TEXT NOT NULL,
    filters       TEXT NOT NULL,
    file_path     TEXT,
    format        TEXT NOT NULL CHECK (format IN ('text', 'csv', 'pdf')),
    CHECK ((format = 'text') = (file_path IS NULL))
);

CREATE INDEX IF NOT EXISTS idx_reports_user ON reports(user_id);
"#;

pub const CURRENT_VERSION: i64 = 1;

/// Additive migrations from version N to N+1, as (from_version, sql)
pub(crate) const MIGRATIONS: &[(i64, &str)] = &[];

/// The tables owned by the ledger
pub const TABLES: &[&str] = &["expenses", "budgets", "reports"];

/// Create the ledger tables if they are missing and bring the schema up to
/// date. Returns the resulting schema version.
pub fn ensure_schema(conn: &mut Connection) -> LedgerResult<i64> {
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_V1)?;

    let stored: Option<i64> =
        tx.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;

    let version = match stored {
        None => {
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![CURRENT_VERSION],
            )?;
            info!("Initialized ledger schema at version {}", CURRENT_VERSION);
            CURRENT_VERSION
        }
        Some(mut version) => {
            for (from, sql) in MIGRATIONS {
                if *from == version {
                    tx.execute_batch(sql)?;
                    version += 1;
                    tx.execute("UPDATE schema_version SET version = ?1", params![version])?;
                    info!("Migrated ledger schema to version {}", version);
                }
            }
            debug!("Ledger schema already at version {}", version);
            version
        }
    };

    tx.commit()?;
    Ok(version)
}

/// Read the recorded schema version, if the schema has been created
pub fn schema_version(conn: &Connection) -> LedgerResult<Option<i64>> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(None);
    }
    let version = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(version)
}
