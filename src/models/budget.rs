//! Budget model
//!
//! A spending limit for one category over an inclusive date window.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, UserId};
use super::money::Money;
use super::period::{BudgetPeriod, DateWindow};

/// A stored budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserId,
    pub category: String,
    pub limit: Money,
    pub period: BudgetPeriod,
    pub window: DateWindow,
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} limit {} ({}, {})",
            self.category, self.limit, self.period, self.window
        )
    }
}

/// A budget that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub user_id: UserId,
    pub category: String,
    pub limit: Money,
    pub period: BudgetPeriod,
    pub window: DateWindow,
}

impl NewBudget {
    pub fn new(
        user_id: UserId,
        category: impl Into<String>,
        limit: Money,
        period: BudgetPeriod,
        window: DateWindow,
    ) -> Self {
        Self {
            user_id,
            category: category.into(),
            limit,
            period,
            window,
        }
    }

    /// Validate before insertion
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.category.trim().is_empty() {
            return Err(BudgetValidationError::EmptyCategory);
        }
        validate_limit(self.limit)
    }
}

/// Budget limits must be strictly positive and at most [`Money::MAX`]
pub fn validate_limit(limit: Money) -> Result<(), BudgetValidationError> {
    if !limit.is_positive() {
        Err(BudgetValidationError::NonPositiveLimit(limit))
    } else if !limit.is_in_range() {
        Err(BudgetValidationError::LimitOutOfRange(limit))
    } else {
        Ok(())
    }
}

/// Point-in-time classification of spending against a budget
///
/// Carries the numbers the caller needs to render a message; wording is left
/// to the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BudgetStatus {
    Exceeded { total: Money, limit: Money },
    Within { total: Money, limit: Money },
    NoBudget { total: Money },
}

impl BudgetStatus {
    /// Classify `total` against an optional limit; only a strictly greater
    /// total counts as exceeded
    pub fn classify(total: Money, limit: Option<Money>) -> Self {
        match limit {
            None => Self::NoBudget { total },
            Some(limit) if total > limit => Self::Exceeded { total, limit },
            Some(limit) => Self::Within { total, limit },
        }
    }

    pub fn total(&self) -> Money {
        match self {
            Self::Exceeded { total, .. } | Self::Within { total, .. } | Self::NoBudget { total } => {
                *total
            }
        }
    }

    pub fn limit(&self) -> Option<Money> {
        match self {
            Self::Exceeded { limit, .. } | Self::Within { limit, .. } => Some(*limit),
            Self::NoBudget { .. } => None,
        }
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(self, Self::Exceeded { .. })
    }

    /// Translation key for rendering this status
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Exceeded { .. } => "budget_exceeded",
            Self::Within { .. } => "budget_within",
            Self::NoBudget { .. } => "no_budget",
        }
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyCategory,
    NonPositiveLimit(Money),
    LimitOutOfRange(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Budget category cannot be empty"),
            Self::NonPositiveLimit(limit) => {
                write!(f, "Budget limit must be positive, got {}", limit)
            }
            Self::LimitOutOfRange(limit) => {
                write!(f, "Budget limit {} exceeds the maximum of {}", limit, Money::MAX)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn january() -> DateWindow {
        DateWindow::parse("2024-01-01", "2024-01-31").unwrap()
    }

    #[test]
    fn test_validation() {
        let ok = NewBudget::new(
            UserId::new(1),
            "Food",
            Money::from_units(200),
            BudgetPeriod::Monthly,
            january(),
        );
        assert!(ok.validate().is_ok());

        let mut zero = ok.clone();
        zero.limit = Money::zero();
        assert!(matches!(
            zero.validate(),
            Err(BudgetValidationError::NonPositiveLimit(_))
        ));

        let mut huge = ok.clone();
        huge.limit = Money::from_cents(i64::MAX);
        assert!(matches!(
            huge.validate(),
            Err(BudgetValidationError::LimitOutOfRange(_))
        ));

        let mut blank = ok;
        blank.category = " ".into();
        assert_eq!(blank.validate(), Err(BudgetValidationError::EmptyCategory));
    }

    #[test]
    fn test_classify_is_strict() {
        let limit = Money::from_units(200);
        assert!(BudgetStatus::classify(Money::from_units(250), Some(limit)).is_exceeded());
        assert_eq!(
            BudgetStatus::classify(limit, Some(limit)),
            BudgetStatus::Within { total: limit, limit }
        );
        assert_eq!(
            BudgetStatus::classify(Money::from_units(10), None),
            BudgetStatus::NoBudget {
                total: Money::from_units(10)
            }
        );
    }

    #[test]
    fn test_status_accessors() {
        let status = BudgetStatus::classify(Money::from_units(250), Some(Money::from_units(200)));
        assert_eq!(status.total(), Money::from_units(250));
        assert_eq!(status.limit(), Some(Money::from_units(200)));
        assert_eq!(status.message_key(), "budget_exceeded");
    }
}
