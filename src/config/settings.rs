//! User settings for the expense ledger
//!
//! Manages preferences that shape report generation: the fallback locale, where
//! exported artifacts go, and how their files are named.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::{ReportFormat, UserId};
use crate::storage::file_io::{read_json, write_json_atomic};

/// Placeholder replaced with the user ID in report file names
pub const USER_PLACEHOLDER: &str = "{user}";

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Locale used when a user has not chosen one
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Where csv/pdf reports are written; `None` means `<base>/reports`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_dir: Option<PathBuf>,

    /// File stem for generated reports; `{user}` expands to the user ID
    #[serde(default = "default_report_file_stem")]
    pub report_file_stem: String,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_report_file_stem() -> String {
    format!("{}_report", USER_PLACEHOLDER)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            reports_dir: None,
            report_file_stem: default_report_file_stem(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist yet
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings: Settings = read_json(paths.settings_file()).map_err(|e| {
            LedgerError::Config(format!("Failed to load settings: {}", e))
        })?;
        Ok(settings)
    }

    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Resolved directory for report artifacts
    pub fn reports_dir(&self, paths: &LedgerPaths) -> PathBuf {
        self.reports_dir
            .clone()
            .unwrap_or_else(|| paths.reports_dir())
    }

    /// Default file name for a user's report in the given format
    pub fn report_file_name(&self, user_id: UserId, format: ReportFormat) -> String {
        let stem = self
            .report_file_stem
            .replace(USER_PLACEHOLDER, &user_id.get().to_string());
        format!("{}.{}", stem, format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_locale, "en");
        assert!(settings.reports_dir.is_none());
        assert_eq!(
            settings.report_file_name(UserId::new(42), ReportFormat::Pdf),
            "42_report.pdf"
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_locale = "es".into();
        settings.reports_dir = Some(temp_dir.path().join("exports"));
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_locale, "es");
        assert_eq!(loaded.reports_dir(&paths), temp_dir.path().join("exports"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"default_locale": "es"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_locale, "es");
        assert_eq!(loaded.report_file_stem, "{user}_report");
        assert_eq!(loaded.reports_dir(&paths), paths.reports_dir());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"schema_version": 1, "report_file_stem": "ledger_{user}"}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(
            loaded.report_file_name(UserId::new(7), ReportFormat::Csv),
            "ledger_7.csv"
        );
    }
}
