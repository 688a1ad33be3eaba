//! Budget service
//!
//! Business logic on top of the budget repository: creating budgets from
//! loose inputs and classifying spending against a category's limit.

use chrono::NaiveDate;
use log::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Budget, BudgetId, BudgetPeriod, BudgetStatus, DateWindow, Money, NewBudget, UserId,
};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a budget for a category over `[start, end]`
    pub fn set_budget(
        &self,
        user_id: UserId,
        category: &str,
        limit: Money,
        period: BudgetPeriod,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LedgerResult<Budget> {
        let window = DateWindow::new(start, end)?;
        let new_budget = NewBudget::new(user_id, category.trim(), limit, period, window);
        let id = self.storage.budgets.insert(&new_budget)?;
        info!("Set {} budget {} for {}", new_budget.category, id, user_id);

        Ok(Budget {
            id,
            user_id,
            category: new_budget.category,
            limit,
            period,
            window,
        })
    }

    pub fn update_limit(&self, user_id: UserId, id: BudgetId, limit: Money) -> LedgerResult<()> {
        self.storage.budgets.update_limit(user_id, id, limit)
    }

    /// Classify the category's spending in `[start, end]` against its budget
    ///
    /// The limit comes from the first budget for the category (lowest ID),
    /// whatever window that budget itself was set for. With no budget the
    /// status still carries the total.
    pub fn check_budget_status(
        &self,
        user_id: UserId,
        category: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LedgerResult<BudgetStatus> {
        let window = DateWindow::new(start, end)?;
        let budget = self.storage.budgets.get_by_category(user_id, category)?;
        let expenses = self
            .storage
            .expenses
            .by_category(user_id, category, Some(window))?;
        let total = Money::checked_sum(expenses.iter().map(|e| e.amount)).ok_or_else(|| {
            LedgerError::Validation(format!("Total for category '{}' overflows", category))
        })?;

        let status = BudgetStatus::classify(total, budget.map(|b| b.limit));
        debug!(
            "Budget status for {} '{}' in {}: {:?}",
            user_id, category, window, status
        );
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewExpense;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spend(storage: &Storage, user: UserId, units: i64, category: &str, day: NaiveDate) {
        storage
            .expenses
            .insert(
                &NewExpense::new(user, Money::from_units(units), "item")
                    .with_category(category)
                    .at(day.and_hms_opt(10, 0, 0).unwrap()),
            )
            .unwrap();
    }

    #[test]
    fn test_exceeded_within_and_no_budget() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let user = UserId::new(1);
        let (start, end) = (date(2024, 1, 1), date(2024, 1, 31));

        service
            .set_budget(user, "Food", Money::from_units(100), BudgetPeriod::Monthly, start, end)
            .unwrap();
        spend(&storage, user, 60, "Food", date(2024, 1, 5));

        let status = service.check_budget_status(user, "Food", start, end).unwrap();
        assert_eq!(
            status,
            BudgetStatus::Within {
                total: Money::from_units(60),
                limit: Money::from_units(100)
            }
        );

        spend(&storage, user, 40, "Food", date(2024, 1, 6));
        let status = service.check_budget_status(user, "Food", start, end).unwrap();
        assert!(!status.is_exceeded(), "equal to the limit is not exceeded");

        spend(&storage, user, 1, "Food", date(2024, 1, 31));
        let status = service.check_budget_status(user, "Food", start, end).unwrap();
        assert!(status.is_exceeded());
        assert_eq!(status.total(), Money::from_units(101));

        spend(&storage, user, 25, "Books", date(2024, 1, 9));
        let status = service.check_budget_status(user, "Books", start, end).unwrap();
        assert_eq!(
            status,
            BudgetStatus::NoBudget {
                total: Money::from_units(25)
            }
        );
    }

    #[test]
    fn test_scenario_other_category_not_counted() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let user = UserId::new(1);
        let (start, end) = (date(2024, 1, 1), date(2024, 1, 31));

        service
            .set_budget(user, "Food", Money::from_units(200), BudgetPeriod::Monthly, start, end)
            .unwrap();
        spend(&storage, user, 100, "Food", date(2024, 1, 3));
        spend(&storage, user, 150, "Food", date(2024, 1, 12));
        spend(&storage, user, 200, "Books", date(2024, 1, 20));

        let status = service.check_budget_status(user, "Food", start, end).unwrap();
        assert_eq!(
            status,
            BudgetStatus::Exceeded {
                total: Money::from_units(250),
                limit: Money::from_units(200)
            }
        );
    }

    #[test]
    fn test_scenario_no_budget_for_category() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let user = UserId::new(1);
        let (start, end) = (date(2024, 1, 1), date(2024, 1, 31));

        service
            .set_budget(user, "Food", Money::from_units(200), BudgetPeriod::Monthly, start, end)
            .unwrap();
        spend(&storage, user, 100, "Food", date(2024, 1, 3));

        let status = service.check_budget_status(user, "Travel", start, end).unwrap();
        assert_eq!(status, BudgetStatus::NoBudget { total: Money::zero() });
        assert_eq!(status.limit(), None);
        assert!(!status.is_exceeded());
    }

    #[test]
    fn test_window_excludes_outside_spending() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let user = UserId::new(1);

        service
            .set_budget(
                user,
                "Food",
                Money::from_units(50),
                BudgetPeriod::Monthly,
                date(2024, 1, 1),
                date(2024, 1, 31),
            )
            .unwrap();
        spend(&storage, user, 500, "Food", date(2024, 2, 1));
        spend(&storage, user, 10, "Food", date(2024, 1, 15));

        let status = service
            .check_budget_status(user, "Food", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();
        assert_eq!(status.total(), Money::from_units(10));
        assert!(!status.is_exceeded());
    }

    #[test]
    fn test_first_budget_wins() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let user = UserId::new(1);
        let (start, end) = (date(2024, 1, 1), date(2024, 12, 31));

        service
            .set_budget(user, "Food", Money::from_units(10), BudgetPeriod::Custom, start, end)
            .unwrap();
        service
            .set_budget(user, "Food", Money::from_units(1000), BudgetPeriod::Custom, start, end)
            .unwrap();
        spend(&storage, user, 20, "Food", date(2024, 3, 3));

        let status = service.check_budget_status(user, "Food", start, end).unwrap();
        assert_eq!(status.limit(), Some(Money::from_units(10)));
        assert!(status.is_exceeded());
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let user = UserId::new(1);

        let inverted = service.set_budget(
            user,
            "Food",
            Money::from_units(10),
            BudgetPeriod::Monthly,
            date(2024, 2, 1),
            date(2024, 1, 1),
        );
        assert!(inverted.unwrap_err().is_validation());

        let zero = service.set_budget(
            user,
            "Food",
            Money::zero(),
            BudgetPeriod::Monthly,
            date(2024, 1, 1),
            date(2024, 1, 31),
        );
        assert!(zero.unwrap_err().is_validation());

        assert!(service
            .check_budget_status(user, "Food", date(2024, 2, 1), date(2024, 1, 1))
            .unwrap_err()
            .is_validation());
    }
}
