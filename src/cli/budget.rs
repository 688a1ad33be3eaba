//! Budget CLI commands
//!
//! Budget windows default to the calendar day/week/month containing today;
//! `custom` budgets need explicit `--start` and `--end`.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;

use super::CliContext;
use crate::error::{LedgerError, LedgerResult};
use crate::models::period::parse_date;
use crate::models::{Budget, BudgetId, BudgetPeriod, Money};
use crate::services::BudgetService;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set a spending limit for a category
    Set {
        /// Category name
        category: String,
        /// Limit (e.g., "100" or "100.00")
        limit: Money,
        /// Cadence: daily, weekly, monthly or custom
        #[arg(short, long, default_value = "monthly")]
        period: BudgetPeriod,
        /// First day of the budget window (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        /// Last day of the budget window (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,
    },

    /// Show the budget for a category
    Show {
        /// Category name
        category: String,
    },

    /// List all budgets
    #[command(alias = "ls")]
    List,

    /// Change the limit of a budget
    Update {
        /// Budget ID
        id: BudgetId,
        /// New limit
        limit: Money,
    },

    /// Delete a budget
    #[command(alias = "rm")]
    Delete {
        /// Budget ID
        id: BudgetId,
    },

    /// Compare spending in a category against its budget
    Status {
        /// Category name
        category: String,
        /// First day to count (defaults to the budget's own window)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        /// Last day to count
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,
    },
}

fn budget_params(budget: &Budget) -> Vec<(&'static str, String)> {
    vec![
        ("id", budget.id.get().to_string()),
        ("category", budget.category.clone()),
        ("limit", budget.limit.to_decimal_string()),
        ("period", budget.period.to_string()),
        ("start", budget.window.start().to_string()),
        ("end", budget.window.end().to_string()),
    ]
}

/// Resolve an explicit or implied window for `period`
fn resolve_window(
    period: BudgetPeriod,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> LedgerResult<(NaiveDate, NaiveDate)> {
    let today = Utc::now().date_naive();
    let implied = period.window_containing(start.unwrap_or(today));

    match (start, end, implied) {
        (Some(start), Some(end), _) => Ok((start, end)),
        (start, end, Some(window)) => Ok((
            start.unwrap_or(window.start()),
            end.unwrap_or(window.end()),
        )),
        (_, _, None) => Err(LedgerError::Validation(
            "Custom budgets need both --start and --end".into(),
        )),
    }
}

/// Handle a budget command
pub fn handle_budget_command(ctx: &CliContext<'_>, cmd: BudgetCommands) -> LedgerResult<()> {
    let user_id = ctx.user_id;
    let service = BudgetService::new(ctx.storage);

    match cmd {
        BudgetCommands::Set {
            category,
            limit,
            period,
            start,
            end,
        } => {
            let (start, end) = resolve_window(period, start, end)?;
            let budget = service.set_budget(user_id, &category, limit, period, start, end)?;
            ctx.say("budget_set", &budget_params(&budget))?;
        }

        BudgetCommands::Show { category } => {
            match ctx.storage.budgets.get_by_category(user_id, category.trim())? {
                Some(budget) => ctx.say("budget_line", &budget_params(&budget))?,
                None => ctx.say("no_budget_for_category", &[("category", category)])?,
            }
        }

        BudgetCommands::List => {
            let budgets = ctx.storage.budgets.list(user_id)?;
            if budgets.is_empty() {
                return ctx.say("no_budgets_found", &[]);
            }
            ctx.say("here_are_your_budgets", &[])?;
            for budget in &budgets {
                ctx.say("budget_line", &budget_params(budget))?;
            }
        }

        BudgetCommands::Update { id, limit } => {
            service.update_limit(user_id, id, limit)?;
            ctx.say(
                "budget_updated",
                &[
                    ("id", id.get().to_string()),
                    ("limit", limit.to_decimal_string()),
                ],
            )?;
        }

        BudgetCommands::Delete { id } => {
            let key = if ctx.storage.budgets.delete(user_id, id)? {
                "budget_deleted"
            } else {
                "budget_not_found"
            };
            ctx.say(key, &[("id", id.get().to_string())])?;
        }

        BudgetCommands::Status {
            category,
            start,
            end,
        } => {
            let category = category.trim();
            let (start, end) = match ctx.storage.budgets.get_by_category(user_id, category)? {
                Some(budget) => (
                    start.unwrap_or(budget.window.start()),
                    end.unwrap_or(budget.window.end()),
                ),
                None => resolve_window(BudgetPeriod::Monthly, start, end)?,
            };

            let status = service.check_budget_status(user_id, category, start, end)?;
            let mut params = vec![
                ("category", category.to_string()),
                ("total", status.total().to_decimal_string()),
            ];
            if let Some(limit) = status.limit() {
                params.push(("limit", limit.to_decimal_string()));
            }
            ctx.say(status.message_key(), &params)?;
        }
    }

    Ok(())
}
