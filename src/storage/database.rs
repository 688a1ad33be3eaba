//! SQLite connection handling
//!
//! One connection guarded by a mutex. Every repository call runs inside its
//! own transaction, so concurrent callers never observe partial rows, and no
//! transaction spans more than one logical operation.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::debug;
use rusqlite::{Connection, Transaction};

use super::schema;
use crate::error::{LedgerError, LedgerResult};

/// Shared handle to the ledger database
pub struct Database {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database file and ensure the schema exists
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            LedgerError::StoreUnavailable(format!("Failed to open {}: {}", path.display(), e))
        })?;
        debug!("Opened ledger database at {}", path.display());
        Self::from_connection(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database (used by tests and dry runs)
    pub fn open_in_memory() -> LedgerResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, None)
    }

    fn from_connection(mut conn: Connection, path: Option<PathBuf>) -> LedgerResult<Self> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        schema::ensure_schema(&mut conn)?;
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Path of the backing file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-run schema creation; a no-op on an up-to-date database
    pub fn ensure_schema(&self) -> LedgerResult<i64> {
        let mut conn = self.lock_conn()?;
        schema::ensure_schema(&mut conn)
    }

    /// Lock the connection, returning an error if the mutex is poisoned
    fn lock_conn(&self) -> LedgerResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LedgerError::StoreUnavailable("SQLite connection poisoned".to_string()))
    }

    /// Run `f` inside a single transaction; commits on `Ok`, rolls back on `Err`
    pub(crate) fn with_transaction<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> LedgerResult<T>,
    {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}
