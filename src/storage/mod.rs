//! Storage layer for the expense ledger
//!
//! SQLite persistence for expenses, budgets and report records behind one
//! shared connection, plus the small JSON side files (language preferences).

pub mod budgets;
pub mod database;
pub mod expenses;
pub mod file_io;
pub mod preferences;
pub mod reports;
pub mod schema;

pub use budgets::BudgetRepository;
pub use database::Database;
pub use expenses::{ExpenseQuery, ExpenseRepository};
pub use file_io::{absolute_path, read_json, write_bytes_atomic, write_json_atomic};
pub use preferences::PreferenceStore;
pub use reports::ReportRepository;
pub use schema::ensure_schema;

use std::sync::Arc;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    db: Arc<Database>,
    pub expenses: ExpenseRepository,
    pub budgets: BudgetRepository,
    pub reports: ReportRepository,
}

impl Storage {
    /// Open the database under the configured data directory
    pub fn open(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;
        let db = Database::open(paths.database_file())?;
        Ok(Self::from_database(db))
    }

    /// Open a throwaway in-memory store
    pub fn in_memory() -> Result<Self, LedgerError> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    fn from_database(db: Database) -> Self {
        let db = Arc::new(db);
        Self {
            expenses: ExpenseRepository::new(Arc::clone(&db)),
            budgets: BudgetRepository::new(Arc::clone(&db)),
            reports: ReportRepository::new(Arc::clone(&db)),
            db,
        }
    }

    /// The shared database handle
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, NewExpense, UserId};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths).unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.database_file().exists());
        assert_eq!(storage.database().path(), Some(paths.database_file().as_path()));
    }

    #[test]
    fn test_data_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let user = UserId::new(1);

        {
            let storage = Storage::open(&paths).unwrap();
            storage
                .expenses
                .insert(&NewExpense::new(user, Money::from_units(9), "Book"))
                .unwrap();
        }

        let storage = Storage::open(&paths).unwrap();
        assert_eq!(storage.expenses.count(user).unwrap(), 1);
    }
}
