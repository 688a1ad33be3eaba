//! Expense model
//!
//! A single ledger row: an amount spent by one user, with a description and an
//! optional free-text category.

use chrono::{NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, UserId};
use super::money::Money;

/// Text layout used for `created_at` in the store and in exported reports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A stored expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserId,
    pub amount: Money,
    pub description: String,
    /// `None` means uncategorized
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Expense {
    /// Category label, or an empty string for uncategorized rows
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn created_at_text(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.amount, self.description)
    }
}

/// An expense that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: UserId,
    pub amount: Money,
    pub description: String,
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewExpense {
    /// Create a new uncategorized expense stamped with the current time
    pub fn new(user_id: UserId, amount: Money, description: impl Into<String>) -> Self {
        Self {
            user_id,
            amount,
            description: description.into(),
            category: None,
            created_at: now_timestamp(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Back-date the expense
    pub fn at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Validate before insertion
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }
        if matches!(&self.category, Some(c) if c.trim().is_empty()) {
            return Err(ExpenseValidationError::EmptyCategory);
        }
        if !self.amount.is_in_range() {
            return Err(ExpenseValidationError::AmountOutOfRange(self.amount));
        }
        Ok(())
    }
}

/// Current UTC time truncated to whole seconds, matching the stored precision
pub fn now_timestamp() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyDescription,
    EmptyCategory,
    AmountOutOfRange(Money),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::EmptyCategory => write!(f, "Category cannot be blank; omit it instead"),
            Self::AmountOutOfRange(amount) => {
                write!(f, "Amount {} exceeds the maximum of {}", amount, Money::MAX)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
