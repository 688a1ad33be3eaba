//! Reports module
//!
//! Report generation over the ledger: filtered fetches, per-category totals,
//! text/csv/pdf output and the records of generated reports.

pub mod aggregate;
pub mod engine;

pub use aggregate::{aggregate_by_category, CategoryTotals};
pub use engine::{Destination, ReportEngine, ReportOutput, ReportRequest};
