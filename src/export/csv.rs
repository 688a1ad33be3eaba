//! CSV emitter
//!
//! Rows follow fetch order; amounts are plain two-decimal numbers and an
//! uncategorized expense has an empty category cell.

use crate::error::{LedgerError, LedgerResult};
use crate::models::Expense;

/// Column names of the CSV artifact
pub const CSV_HEADER: [&str; 6] = [
    "id",
    "user_id",
    "amount",
    "description",
    "category",
    "created_at",
];

/// Render expenses as CSV bytes, header first
pub fn render_csv(expenses: &[Expense]) -> LedgerResult<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for expense in expenses {
        writer.write_record([
            expense.id.get().to_string(),
            expense.user_id.get().to_string(),
            expense.amount.to_decimal_string(),
            expense.description.clone(),
            expense.category_label().to_string(),
            expense.created_at_text(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| LedgerError::Export(format!("Failed to finish CSV: {}", e)))
}
