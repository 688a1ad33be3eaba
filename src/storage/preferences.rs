//! Per-user language preferences
//!
//! An explicit keyed store shared by reference with whoever needs it, instead
//! of a process-wide mutable map. Reads and writes go through an `RwLock`;
//! when a backing file is configured every change is persisted with an
//! atomic write.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use log::debug;
use serde::{Deserialize, Serialize};

use super::file_io::{read_json, write_json_atomic};
use crate::error::{LedgerError, LedgerResult};
use crate::models::UserId;

/// Serializable preference data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PreferenceData {
    #[serde(default)]
    languages: HashMap<UserId, String>,
}

/// Synchronized store of user language preferences
pub struct PreferenceStore {
    path: Option<PathBuf>,
    default_locale: String,
    languages: RwLock<HashMap<UserId, String>>,
}

impl PreferenceStore {
    /// A store that lives only in memory
    pub fn in_memory(default_locale: impl Into<String>) -> Self {
        Self {
            path: None,
            default_locale: default_locale.into(),
            languages: RwLock::new(HashMap::new()),
        }
    }

    /// Load preferences from `path`; a missing file starts empty
    pub fn load(path: PathBuf, default_locale: impl Into<String>) -> LedgerResult<Self> {
        let data: PreferenceData = read_json(&path)?;
        Ok(Self {
            path: Some(path),
            default_locale: default_locale.into(),
            languages: RwLock::new(data.languages),
        })
    }

    /// The user's language, falling back to the default locale
    pub fn language(&self, user_id: UserId) -> LedgerResult<String> {
        let languages = self.languages.read().map_err(|e| {
            LedgerError::StoreUnavailable(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(languages
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| self.default_locale.clone()))
    }

    /// Set (or replace) the user's language
    pub fn set_language(&self, user_id: UserId, locale: &str) -> LedgerResult<()> {
        let locale = locale.trim().to_lowercase();
        if locale.is_empty() {
            return Err(LedgerError::Validation("Locale cannot be empty".into()));
        }

        let mut languages = self.languages.write().map_err(|e| {
            LedgerError::StoreUnavailable(format!("Failed to acquire write lock: {}", e))
        })?;
        languages.insert(user_id, locale.clone());

        if let Some(path) = &self.path {
            let data = PreferenceData {
                languages: languages.clone(),
            };
            write_json_atomic(path, &data)?;
        }
        debug!("Language for {} set to {}", user_id, locale);
        Ok(())
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_default_when_unset() {
        let store = PreferenceStore::in_memory("en");
        assert_eq!(store.language(UserId::new(1)).unwrap(), "en");
    }

    #[test]
    fn test_set_and_get() {
        let store = PreferenceStore::in_memory("en");
        store.set_language(UserId::new(1), "ES").unwrap();
        assert_eq!(store.language(UserId::new(1)).unwrap(), "es");
        assert_eq!(store.language(UserId::new(2)).unwrap(), "en");
        assert!(store.set_language(UserId::new(1), " ").unwrap_err().is_validation());
    }

    #[test]
    fn test_persists_across_loads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        let store = PreferenceStore::load(path.clone(), "en").unwrap();
        store.set_language(UserId::new(7), "es").unwrap();

        let reloaded = PreferenceStore::load(path, "en").unwrap();
        assert_eq!(reloaded.language(UserId::new(7)).unwrap(), "es");
    }

    #[test]
    fn test_concurrent_writers() {
        let store = Arc::new(PreferenceStore::in_memory("en"));
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let locale = if n % 2 == 0 { "en" } else { "es" };
                    store.set_language(UserId::new(n), locale).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.language(UserId::new(3)).unwrap(), "es");
        assert_eq!(store.language(UserId::new(4)).unwrap(), "en");
    }
}
