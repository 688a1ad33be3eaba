//! Custom error types for the expense ledger
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The backing store could not be reached or a transaction failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A report format outside text/csv/pdf was requested
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Report emission errors
    #[error("Export error: {0}")]
    Export(String),

    /// File transport errors
    #[error("Transport error: {0}")]
    Transport(String),
}

impl LedgerError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for reports
    pub fn report_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Report",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for stored files
    pub fn file_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "File",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the store could not be reached
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

// Implement From traits for common error types

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<crate::models::period::PeriodParseError> for LedgerError {
    fn from(err: crate::models::period::PeriodParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<crate::models::money::MoneyParseError> for LedgerError {
    fn from(err: crate::models::money::MoneyParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<crate::models::report::UnsupportedFormat> for LedgerError {
    fn from(err: crate::models::report::UnsupportedFormat) -> Self {
        Self::UnsupportedFormat(err.0)
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnsupportedFormat("xlsx".into());
        assert_eq!(err.to_string(), "Unsupported report format: xlsx");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::expense_not_found("42");
        assert_eq!(err.to_string(), "Expense not found: 42");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_sqlite_error() {
        let sql_err = rusqlite::Error::InvalidQuery;
        let err: LedgerError = sql_err.into();
        assert!(err.is_store_unavailable());
    }

    #[test]
    fn test_from_parse_errors() {
        let err: LedgerError = "xlsx"
            .parse::<crate::models::ReportFormat>()
            .unwrap_err()
            .into();
        assert!(matches!(err, LedgerError::UnsupportedFormat(ref f) if f == "xlsx"));

        let err: LedgerError = crate::models::Money::parse("1.234").unwrap_err().into();
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
    }
}
