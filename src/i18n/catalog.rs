//! Built-in English and Spanish message tables

use log::debug;

use super::{interpolate, Translator};

/// Locale used when the requested one has no table or lacks a key
pub const FALLBACK_LOCALE: &str = "en";

type Table = &'static [(&'static str, &'static str)];

const EN: Table = &[
    ("expense_logged", "Expense logged with ID {id}: {amount} for {description}."),
    ("expense_deleted", "Expense with ID {id} deleted."),
    ("expense_not_found", "No expense with ID {id} was found."),
    ("expense_updated", "Expense with ID {id} has been updated with amount {amount} and description '{description}'."),
    ("expense_categorized", "Expense with ID {id} is now in category '{category}'."),
    ("update_failed", "Failed to update expense: {error}"),
    ("no_expenses_found", "No expenses found."),
    ("here_are_your_expenses", "Here are your expenses:"),
    ("expense_line", "ID: {id}, Amount: {amount}, Description: {description}, Category: {category}, Date: {date}"),
    ("budget_set", "Budget {id} set for '{category}': limit {limit} ({period}, {start} to {end})."),
    ("budget_updated", "Budget {id} limit changed to {limit}."),
    ("budget_deleted", "Budget {id} deleted."),
    ("budget_not_found", "No budget with ID {id} was found."),
    ("no_budget_for_category", "No budget found for '{category}'."),
    ("no_budgets_found", "No budgets found."),
    ("here_are_your_budgets", "Here are your budgets:"),
    ("budget_line", "ID: {id}, Category: {category}, Limit: {limit}, Period: {period}, From: {start}, To: {end}"),
    ("budget_exceeded", "Budget exceeded for '{category}': spent {total} of {limit}."),
    ("budget_within", "Within budget for '{category}': spent {total} of {limit}."),
    ("no_budget", "No budget set for '{category}'. Total spent: {total}."),
    ("report_generated", "Expense Report"),
    ("total_expenses", "Total expenses: {total}"),
    ("no_report_data", "No data available for the report."),
    ("file_saved", "Report saved to {path}."),
    ("report_logged", "Report recorded with ID {id}."),
    ("report_deleted", "Report with ID {id} deleted."),
    ("report_not_found", "No report with ID {id} was found."),
    ("no_reports_found", "No reports found."),
    ("here_are_your_reports", "Here are your reports:"),
    ("report_line", "ID: {id}, Format: {format}, Created: {date}, File: {path}"),
    ("report_format_not_supported", "Format '{format}' is not supported."),
    ("orphans_removed", "Removed {count} orphaned report file(s)."),
    ("language_set", "Language set to {language}."),
    ("current_language", "Current language: {language}."),
    ("unsupported_language", "Unsupported language. Available options: {options}"),
];

const ES: Table = &[
    ("expense_logged", "Gasto registrado con ID {id}: {amount} por {description}."),
    ("expense_deleted", "Gasto con ID {id} eliminado."),
    ("expense_not_found", "No se encontró ningún gasto con ID {id}."),
    ("expense_updated", "Gasto con ID {id} se ha actualizado con la cantidad {amount} y descripción '{description}'."),
    ("expense_categorized", "El gasto con ID {id} ahora está en la categoría '{category}'."),
    ("update_failed", "No se pudo actualizar el gasto: {error}"),
    ("no_expenses_found", "No se encontraron gastos."),
    ("here_are_your_expenses", "Aquí están tus gastos:"),
    ("expense_line", "ID: {id}, Cantidad: {amount}, Descripción: {description}, Categoría: {category}, Fecha: {date}"),
    ("budget_set", "Presupuesto {id} establecido para '{category}': límite {limit} ({period}, {start} a {end})."),
    ("budget_updated", "El límite del presupuesto {id} cambió a {limit}."),
    ("budget_deleted", "Presupuesto {id} eliminado."),
    ("budget_not_found", "No se encontró ningún presupuesto con ID {id}."),
    ("no_budget_for_category", "No se encontró presupuesto para '{category}'."),
    ("no_budgets_found", "No se encontraron presupuestos."),
    ("here_are_your_budgets", "Aquí están tus presupuestos:"),
    ("budget_line", "ID: {id}, Categoría: {category}, Límite: {limit}, Periodo: {period}, Desde: {start}, Hasta: {end}"),
    ("budget_exceeded", "Presupuesto excedido para '{category}': gastaste {total} de {limit}."),
    ("budget_within", "Dentro del presupuesto para '{category}': gastaste {total} de {limit}."),
    ("no_budget", "No hay presupuesto para '{category}'. Total gastado: {total}."),
    ("report_generated", "Reporte de gastos"),
    ("total_expenses", "Total de gastos: {total}"),
    ("no_report_data", "No hay datos disponibles para el reporte."),
    ("file_saved", "Reporte guardado en {path}."),
    ("report_logged", "Reporte registrado con ID {id}."),
    ("report_deleted", "Reporte con ID {id} eliminado."),
    ("report_not_found", "No se encontró ningún reporte con ID {id}."),
    ("no_reports_found", "No se encontraron reportes."),
    ("here_are_your_reports", "Aquí están tus reportes:"),
    ("report_line", "ID: {id}, Formato: {format}, Creado: {date}, Archivo: {path}"),
    ("report_format_not_supported", "El formato '{format}' no es compatible."),
    ("orphans_removed", "Se eliminaron {count} archivo(s) de reporte huérfanos."),
    ("language_set", "Idioma establecido a {language}."),
    ("current_language", "Idioma actual: {language}."),
    ("unsupported_language", "Idioma no compatible. Opciones disponibles: {options}"),
];

/// Static message catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    pub fn new() -> Self {
        Self
    }

    /// Locales with a message table
    pub fn locales() -> &'static [&'static str] {
        &["en", "es"]
    }

    fn table(locale: &str) -> Option<Table> {
        match locale {
            "en" => Some(EN),
            "es" => Some(ES),
            _ => None,
        }
    }

    fn lookup(table: Table, key: &str) -> Option<&'static str> {
        table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str, locale: &str, params: &[(&str, String)]) -> String {
        let template = Self::table(locale)
            .and_then(|table| Self::lookup(table, key))
            .or_else(|| Self::lookup(EN, key));

        match template {
            Some(template) => interpolate(template, params),
            None => {
                debug!("No translation for '{}' in '{}'", key, locale);
                key.to_string()
            }
        }
    }

    fn supports(&self, locale: &str) -> bool {
        Self::table(locale).is_some()
    }
}
