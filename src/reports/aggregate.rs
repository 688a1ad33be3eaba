//! Per-category totals

use std::collections::BTreeMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, Money};

/// Category totals keyed by category; `None` collects uncategorized rows
pub type CategoryTotals = BTreeMap<Option<String>, Money>;

/// Sum amounts per category
///
/// Only categories that actually occur get an entry, so an empty input yields
/// an empty map. A total that would overflow is a validation error.
pub fn aggregate_by_category(expenses: &[Expense]) -> LedgerResult<CategoryTotals> {
    let mut totals = CategoryTotals::new();
    for expense in expenses {
        let total = totals
            .entry(expense.category.clone())
            .or_insert_with(Money::zero);
        *total = total.checked_add(expense.amount).ok_or_else(|| {
            LedgerError::Validation(format!(
                "Total for category '{}' overflows",
                expense.category_label()
            ))
        })?;
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::expense;

    #[test]
    fn test_aggregate() {
        let expenses = vec![
            expense(1, 10000, "Groceries", Some("Food")),
            expense(2, 1500, "Bus", Some("Transport")),
            expense(3, 4000, "Lunch", Some("Food")),
            expense(4, 999, "Gift", None),
        ];
        let totals = aggregate_by_category(&expenses).unwrap();

        assert_eq!(totals.len(), 3);
        assert_eq!(totals[&Some("Food".to_string())], Money::from_cents(14000));
        assert_eq!(totals[&Some("Transport".to_string())], Money::from_cents(1500));
        assert_eq!(totals[&None], Money::from_cents(999));
    }

    #[test]
    fn test_aggregate_overflow_is_an_error() {
        let huge = i64::MAX / 2 + 1;
        let expenses = vec![
            expense(1, huge, "Yacht", Some("Toys")),
            expense(2, huge, "Jet", Some("Toys")),
        ];
        let err = aggregate_by_category(&expenses).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Toys"));
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_by_category(&[]).unwrap().is_empty());
    }
}
