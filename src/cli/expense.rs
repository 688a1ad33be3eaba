//! Expense CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::CliContext;
use crate::error::LedgerResult;
use crate::export::expense_line;
use crate::models::period::parse_date;
use crate::models::{ExpenseId, Money, NewExpense};
use crate::storage::ExpenseQuery;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Log a new expense
    #[command(alias = "log")]
    Add {
        /// Amount (e.g., "12" or "12.50"; negative for refunds)
        #[arg(allow_negative_numbers = true)]
        amount: Money,
        /// What the money was spent on
        description: String,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
        /// Date of the expense (YYYY-MM-DD), defaults to now
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// List expenses, oldest first
    #[command(alias = "ls")]
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Earliest date (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
    },

    /// Replace the amount and description of an expense
    Update {
        /// Expense ID
        id: ExpenseId,
        /// New amount
        #[arg(allow_negative_numbers = true)]
        amount: Money,
        /// New description
        description: String,
    },

    /// Set or clear the category of an expense
    Categorize {
        /// Expense ID
        id: ExpenseId,
        /// New category; omit to clear it
        category: Option<String>,
    },

    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID
        id: ExpenseId,
    },
}

/// Handle an expense command
pub fn handle_expense_command(ctx: &CliContext<'_>, cmd: ExpenseCommands) -> LedgerResult<()> {
    let user_id = ctx.user_id;

    match cmd {
        ExpenseCommands::Add {
            amount,
            description,
            category,
            date,
        } => {
            let mut expense = NewExpense::new(user_id, amount, description.trim());
            if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
                expense = expense.with_category(category.trim());
            }
            if let Some(date) = date {
                expense = expense.at(date.and_time(chrono::NaiveTime::MIN));
            }

            let id = ctx.storage.expenses.insert(&expense)?;
            ctx.say(
                "expense_logged",
                &[
                    ("id", id.get().to_string()),
                    ("amount", amount.to_decimal_string()),
                    ("description", expense.description.clone()),
                ],
            )?;
        }

        ExpenseCommands::List { category, from, to } => {
            let query = ExpenseQuery {
                start: from,
                end: to,
                category: category.as_deref(),
            };
            let expenses = ctx.storage.expenses.find(user_id, &query)?;
            if expenses.is_empty() {
                return ctx.say("no_expenses_found", &[]);
            }

            let locale = ctx.locale()?;
            ctx.say("here_are_your_expenses", &[])?;
            for expense in &expenses {
                println!("{}", expense_line(expense, ctx.translator, &locale));
            }
        }

        ExpenseCommands::Update {
            id,
            amount,
            description,
        } => {
            ctx.storage
                .expenses
                .update(user_id, id, amount, description.trim())?;
            ctx.say(
                "expense_updated",
                &[
                    ("id", id.get().to_string()),
                    ("amount", amount.to_decimal_string()),
                    ("description", description.trim().to_string()),
                ],
            )?;
        }

        ExpenseCommands::Categorize { id, category } => {
            let category = category.as_deref().map(str::trim).filter(|c| !c.is_empty());
            ctx.storage.expenses.update_category(user_id, id, category)?;
            ctx.say(
                "expense_categorized",
                &[
                    ("id", id.get().to_string()),
                    ("category", category.unwrap_or("-").to_string()),
                ],
            )?;
        }

        ExpenseCommands::Delete { id } => {
            let key = if ctx.storage.expenses.delete(user_id, id)? {
                "expense_deleted"
            } else {
                "expense_not_found"
            };
            ctx.say(key, &[("id", id.get().to_string())])?;
        }
    }

    Ok(())
}
