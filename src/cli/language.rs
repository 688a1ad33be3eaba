//! Language CLI commands

use clap::Subcommand;

use super::CliContext;
use crate::error::{LedgerError, LedgerResult};
use crate::i18n::Catalog;

/// Language subcommands
#[derive(Subcommand)]
pub enum LanguageCommands {
    /// Choose the language for messages and reports
    Set {
        /// Locale code, e.g. "en" or "es"
        locale: String,
    },

    /// Show the current language
    Show,
}

/// Handle a language command
pub fn handle_language_command(ctx: &CliContext<'_>, cmd: LanguageCommands) -> LedgerResult<()> {
    match cmd {
        LanguageCommands::Set { locale } => {
            let locale = locale.trim().to_lowercase();
            if !ctx.translator.supports(&locale) {
                let message = ctx.message(
                    "unsupported_language",
                    &[("options", Catalog::locales().join(", "))],
                )?;
                return Err(LedgerError::Validation(message));
            }
            ctx.preferences.set_language(ctx.user_id, &locale)?;
            ctx.say("language_set", &[("language", locale)])?;
        }

        LanguageCommands::Show => {
            ctx.say("current_language", &[("language", ctx.locale()?)])?;
        }
    }

    Ok(())
}
