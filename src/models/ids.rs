//! Strongly-typed ID wrappers for all entity types
//!
//! IDs are assigned by the store (SQLite rowids), so each wrapper holds an
//! `i64`. Newtypes keep expense, budget, report and user IDs from being mixed
//! up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw store identifier
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the underlying integer
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(ExpenseId, "exp-");
define_id!(BudgetId, "bud-");
define_id!(ReportId, "rpt-");
define_id!(UserId, "user-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(ExpenseId::new(7).to_string(), "exp-7");
        assert_eq!(UserId::new(1).to_string(), "user-1");
    }

    #[test]
    fn test_id_parse_with_and_without_prefix() {
        assert_eq!("12".parse::<ExpenseId>().unwrap(), ExpenseId::new(12));
        assert_eq!("bud-3".parse::<BudgetId>().unwrap(), BudgetId::new(3));
        assert!("rpt-x".parse::<ReportId>().is_err());
    }

    #[test]
    fn test_id_ordering_follows_raw_value() {
        assert!(ExpenseId::new(1) < ExpenseId::new(2));
    }

    #[test]
    fn test_id_serialization() {
        let id = ReportId::new(99);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "99");
        let back: ReportId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
