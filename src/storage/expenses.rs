//! Expense repository (the ledger store)
//!
//! CRUD over the `expenses` table. Every call is scoped to a `user_id`: rows
//! belonging to another user are invisible, so an update aimed at someone
//! else's expense reports `NotFound` instead of silently mutating it.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::database::Database;
use crate::error::{LedgerError, LedgerResult};
use crate::models::expense::TIMESTAMP_FORMAT;
use crate::models::period::DATE_FORMAT;
use crate::models::expense::ExpenseValidationError;
use crate::models::{DateWindow, Expense, ExpenseId, Money, NewExpense, UserId};

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, amount_cents, description, category, created_at FROM expenses";

/// Conjunctive filter over a user's ledger; `None` fields are unconstrained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseQuery<'q> {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub category: Option<&'q str>,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    db: Arc<Database>,
}

impl ExpenseRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new expense and return its freshly assigned ID
    pub fn insert(&self, expense: &NewExpense) -> LedgerResult<ExpenseId> {
        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let id = self.db.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO expenses (user_id, amount_cents, description, category, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    expense.user_id.get(),
                    expense.amount.cents(),
                    expense.description,
                    expense.category,
                    expense.created_at.format(TIMESTAMP_FORMAT).to_string(),
                ],
            )?;
            Ok(ExpenseId::new(tx.last_insert_rowid()))
        })?;

        debug!("Inserted expense {} for {}", id, expense.user_id);
        Ok(id)
    }

    /// Get one of the user's expenses by ID
    pub fn get(&self, user_id: UserId, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        self.db.with_transaction(|tx| {
            let sql = format!("{} WHERE user_id = ?1 AND id = ?2", SELECT_COLUMNS);
            let expense = tx
                .query_row(&sql, params![user_id.get(), id.get()], row_to_expense)
                .optional()?;
            Ok(expense)
        })
    }

    /// All of the user's expenses in insertion order
    pub fn list(&self, user_id: UserId) -> LedgerResult<Vec<Expense>> {
        self.find(user_id, &ExpenseQuery::default())
    }

    /// Expenses in a category, optionally restricted to an inclusive window
    pub fn by_category(
        &self,
        user_id: UserId,
        category: &str,
        window: Option<DateWindow>,
    ) -> LedgerResult<Vec<Expense>> {
        let query = ExpenseQuery {
            start: window.map(|w| w.start()),
            end: window.map(|w| w.end()),
            category: Some(category),
        };
        self.find(user_id, &query)
    }

    /// Run a conjunctive query, ordered by ID ascending
    pub fn find(&self, user_id: UserId, query: &ExpenseQuery<'_>) -> LedgerResult<Vec<Expense>> {
        let mut sql = format!("{} WHERE user_id = ?", SELECT_COLUMNS);
        let mut values = vec![Value::Integer(user_id.get())];

        if let Some(start) = query.start {
            sql.push_str(" AND date(created_at) >= ?");
            values.push(Value::Text(start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = query.end {
            sql.push_str(" AND date(created_at) <= ?");
            values.push(Value::Text(end.format(DATE_FORMAT).to_string()));
        }
        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            values.push(Value::Text(category.to_string()));
        }
        sql.push_str(" ORDER BY id ASC");

        self.db.with_transaction(|tx| {
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), row_to_expense)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Replace amount and description; category and timestamp are untouched
    pub fn update(
        &self,
        user_id: UserId,
        id: ExpenseId,
        amount: Money,
        description: &str,
    ) -> LedgerResult<()> {
        if description.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Expense description cannot be empty".into(),
            ));
        }
        if !amount.is_in_range() {
            return Err(LedgerError::Validation(
                ExpenseValidationError::AmountOutOfRange(amount).to_string(),
            ));
        }

        let changed = self.db.with_transaction(|tx| {
            Ok(tx.execute(
                "UPDATE expenses SET amount_cents = ?1, description = ?2
                 WHERE id = ?3 AND user_id = ?4",
                params![amount.cents(), description, id.get(), user_id.get()],
            )?)
        })?;

        if changed == 0 {
            return Err(LedgerError::expense_not_found(id.to_string()));
        }
        debug!("Updated expense {} for {}", id, user_id);
        Ok(())
    }

    /// Set or clear the category of an existing expense
    pub fn update_category(
        &self,
        user_id: UserId,
        id: ExpenseId,
        category: Option<&str>,
    ) -> LedgerResult<()> {
        if matches!(category, Some(c) if c.trim().is_empty()) {
            return Err(LedgerError::Validation(
                "Category cannot be blank; omit it instead".into(),
            ));
        }

        let changed = self.db.with_transaction(|tx| {
            Ok(tx.execute(
                "UPDATE expenses SET category = ?1 WHERE id = ?2 AND user_id = ?3",
                params![category, id.get(), user_id.get()],
            )?)
        })?;

        if changed == 0 {
            return Err(LedgerError::expense_not_found(id.to_string()));
        }
        Ok(())
    }

    /// Delete an expense; returns whether a row was removed. Deleting an
    /// absent ID is not an error.
    pub fn delete(&self, user_id: UserId, id: ExpenseId) -> LedgerResult<bool> {
        let removed = self.db.with_transaction(|tx| {
            Ok(tx.execute(
                "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
                params![id.get(), user_id.get()],
            )?)
        })?;
        debug!("Delete expense {} for {}: {} row(s)", id, user_id, removed);
        Ok(removed > 0)
    }

    /// Number of expenses the user has
    pub fn count(&self, user_id: UserId) -> LedgerResult<usize> {
        self.db.with_transaction(|tx| {
            let count: i64 = tx.query_row(
                "SELECT COUNT(*) FROM expenses WHERE user_id = ?1",
                params![user_id.get()],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        })
    }
}

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let created_at: String = row.get(5)?;
    let created_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Expense {
        id: ExpenseId::new(row.get(0)?),
        user_id: UserId::new(row.get(1)?),
        amount: Money::from_cents(row.get(2)?),
        description: row.get(3)?,
        category: row.get(4)?,
        created_at,
    })
}
