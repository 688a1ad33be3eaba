//! Report emitters
//!
//! Turns a fetched set of expenses into one of the supported output formats:
//! - Text: inline, human-readable
//! - CSV: one row per expense, for spreadsheets
//! - PDF: a single page carrying the same lines as the text emitter
//!
//! Text and PDF share a [`ReportDocument`] so their content stays identical.

pub mod csv;
pub mod pdf;
pub mod text;

pub use self::csv::{render_csv, CSV_HEADER};
pub use self::pdf::render_pdf;
pub use self::text::render_text;

use crate::i18n::Translator;
use crate::models::Expense;

/// Localized prose of a report: header, one line per expense and a summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub title: String,
    pub lines: Vec<String>,
    pub summary: String,
}

impl ReportDocument {
    /// Build the document for `expenses` in the given locale
    pub fn build(expenses: &[Expense], translator: &dyn Translator, locale: &str) -> Self {
        let title = translator.translate("report_generated", locale, &[]);
        let lines = expenses
            .iter()
            .map(|expense| expense_line(expense, translator, locale))
            .collect();
        let summary = translator.translate(
            "total_expenses",
            locale,
            &[("total", expenses.len().to_string())],
        );

        Self {
            title,
            lines,
            summary,
        }
    }
}

/// One expense rendered as `ID, Amount, Description, Category, Date`
pub fn expense_line(expense: &Expense, translator: &dyn Translator, locale: &str) -> String {
    translator.translate(
        "expense_line",
        locale,
        &[
            ("id", expense.id.get().to_string()),
            ("amount", expense.amount.to_decimal_string()),
            ("description", expense.description.clone()),
            ("category", expense.category.clone().unwrap_or_else(|| "-".into())),
            ("date", expense.created_at_text()),
        ],
    )
}
