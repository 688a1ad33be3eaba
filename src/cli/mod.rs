//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the storage, service and report
//! layers. All prose goes through the translator in the caller's language.

pub mod budget;
pub mod expense;
pub mod language;
pub mod report;

pub use budget::{handle_budget_command, BudgetCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use language::{handle_language_command, LanguageCommands};
pub use report::{handle_report_command, ReportCommands};

use crate::config::{LedgerPaths, Settings};
use crate::error::LedgerResult;
use crate::i18n::Translator;
use crate::models::UserId;
use crate::reports::ReportEngine;
use crate::storage::{PreferenceStore, Storage};
use crate::transport::FileTransport;

/// Everything a command handler needs, for one acting user
pub struct CliContext<'a> {
    pub storage: &'a Storage,
    pub paths: &'a LedgerPaths,
    pub settings: &'a Settings,
    pub preferences: &'a PreferenceStore,
    pub translator: &'a dyn Translator,
    pub transport: &'a dyn FileTransport,
    pub user_id: UserId,
}

impl<'a> CliContext<'a> {
    /// The acting user's language
    pub fn locale(&self) -> LedgerResult<String> {
        self.preferences.language(self.user_id)
    }

    /// Translate a message in the acting user's language
    pub fn message(&self, key: &str, params: &[(&str, String)]) -> LedgerResult<String> {
        Ok(self.translator.translate(key, &self.locale()?, params))
    }

    /// Print a translated message
    pub fn say(&self, key: &str, params: &[(&str, String)]) -> LedgerResult<()> {
        println!("{}", self.message(key, params)?);
        Ok(())
    }

    pub fn report_engine(&self) -> ReportEngine<'a> {
        ReportEngine::new(
            self.storage,
            self.transport,
            self.translator,
            self.preferences,
            self.settings,
            self.settings.reports_dir(self.paths),
        )
    }
}
