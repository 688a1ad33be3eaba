//! Budget repository
//!
//! CRUD over the `budgets` table. Overlapping windows for the same
//! `(user_id, category)` are stored as given; lookups return the lowest ID.

use std::sync::Arc;

use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use super::database::Database;
use crate::error::{LedgerError, LedgerResult};
use crate::models::budget::validate_limit;
use crate::models::period::{parse_date, DATE_FORMAT};
use crate::models::{Budget, BudgetId, BudgetPeriod, DateWindow, Money, NewBudget, UserId};

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, category, limit_cents, period, start_date, end_date FROM budgets";

/// Repository for budget persistence
pub struct BudgetRepository {
    db: Arc<Database>,
}

impl BudgetRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a budget and return its ID
    pub fn insert(&self, budget: &NewBudget) -> LedgerResult<BudgetId> {
        budget
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let id = self.db.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO budgets (user_id, category, limit_cents, period, start_date, end_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    budget.user_id.get(),
                    budget.category,
                    budget.limit.cents(),
                    budget.period.as_str(),
                    budget.window.start().format(DATE_FORMAT).to_string(),
                    budget.window.end().format(DATE_FORMAT).to_string(),
                ],
            )?;
            Ok(BudgetId::new(tx.last_insert_rowid()))
        })?;

        debug!(
            "Inserted budget {} for {} ({})",
            id, budget.user_id, budget.category
        );
        Ok(id)
    }

    /// Get one of the user's budgets by ID
    pub fn get(&self, user_id: UserId, id: BudgetId) -> LedgerResult<Option<Budget>> {
        self.db.with_transaction(|tx| {
            let sql = format!("{} WHERE user_id = ?1 AND id = ?2", SELECT_COLUMNS);
            Ok(tx
                .query_row(&sql, params![user_id.get(), id.get()], row_to_budget)
                .optional()?)
        })
    }

    /// First budget for the category, by ID; `None` when there is none
    pub fn get_by_category(&self, user_id: UserId, category: &str) -> LedgerResult<Option<Budget>> {
        self.db.with_transaction(|tx| {
            let sql = format!(
                "{} WHERE user_id = ?1 AND category = ?2 ORDER BY id ASC LIMIT 1",
                SELECT_COLUMNS
            );
            Ok(tx
                .query_row(&sql, params![user_id.get(), category], row_to_budget)
                .optional()?)
        })
    }

    /// All of the user's budgets by ID
    pub fn list(&self, user_id: UserId) -> LedgerResult<Vec<Budget>> {
        self.db.with_transaction(|tx| {
            let sql = format!("{} WHERE user_id = ?1 ORDER BY id ASC", SELECT_COLUMNS);
            let mut stmt = tx.prepare(&sql)?;
            let budgets = stmt
                .query_map(params![user_id.get()], row_to_budget)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(budgets)
        })
    }

    /// Replace the limit of an existing budget
    pub fn update_limit(&self, user_id: UserId, id: BudgetId, limit: Money) -> LedgerResult<()> {
        validate_limit(limit).map_err(|e| LedgerError::Validation(e.to_string()))?;

        let changed = self.db.with_transaction(|tx| {
            Ok(tx.execute(
                "UPDATE budgets SET limit_cents = ?1 WHERE id = ?2 AND user_id = ?3",
                params![limit.cents(), id.get(), user_id.get()],
            )?)
        })?;

        if changed == 0 {
            return Err(LedgerError::budget_not_found(id.to_string()));
        }
        debug!("Updated budget {} limit to {}", id, limit);
        Ok(())
    }

    /// Delete a budget; returns whether a row was removed
    pub fn delete(&self, user_id: UserId, id: BudgetId) -> LedgerResult<bool> {
        let removed = self.db.with_transaction(|tx| {
            Ok(tx.execute(
                "DELETE FROM budgets WHERE id = ?1 AND user_id = ?2",
                params![id.get(), user_id.get()],
            )?)
        })?;
        Ok(removed > 0)
    }
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn row_to_budget(row: &Row<'_>) -> rusqlite::Result<Budget> {
    let period: String = row.get(4)?;
    let period: BudgetPeriod = period.parse().map_err(|e| conversion_error(4, e))?;

    let start: String = row.get(5)?;
    let end: String = row.get(6)?;
    let start = parse_date(&start).map_err(|e| conversion_error(5, e))?;
    let end = parse_date(&end).map_err(|e| conversion_error(6, e))?;
    let window = DateWindow::new(start, end).map_err(|e| conversion_error(6, e))?;

    Ok(Budget {
        id: BudgetId::new(row.get(0)?),
        user_id: UserId::new(row.get(1)?),
        category: row.get(2)?,
        limit: Money::from_cents(row.get(3)?),
        period,
        window,
    })
}
