//! Core data models for the expense ledger
//!
//! This module contains the entities the store persists (expenses, budgets,
//! report records) and the value types they are built from.

pub mod budget;
pub mod expense;
pub mod ids;
pub mod money;
pub mod period;
pub mod report;

pub use budget::{Budget, BudgetStatus, NewBudget};
pub use expense::{Expense, NewExpense};
pub use ids::{BudgetId, ExpenseId, ReportId, UserId};
pub use money::Money;
pub use period::{BudgetPeriod, DateWindow};
pub use report::{NewReport, Report, ReportFilters, ReportFormat};
