//! Service layer
//!
//! Business logic that spans more than one repository.

pub mod budget;

pub use budget::BudgetService;
