use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;

use super::{KeyValueStore, StorageError};

pub const DEFAULT_THEME: &str = "indigo";

/// Presentation preferences persisted next to the collection. The theme id
/// is opaque here; the presentation layer decides what it means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: String,
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            dark_mode: false,
        }
    }
}

impl Preferences {
    /// Read preferences, falling back to defaults for anything missing or
    /// unreadable. `darkMode` is on only for the exact string `"true"`.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, config: &StoreConfig) -> Self {
        let defaults = Self::default();

        let theme = read_or_warn(store, &config.theme_key)
            .filter(|theme| !theme.is_empty())
            .unwrap_or(defaults.theme);
        let dark_mode = read_or_warn(store, &config.dark_mode_key)
            .map(|value| value == "true")
            .unwrap_or(defaults.dark_mode);

        Self { theme, dark_mode }
    }

    pub fn save<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        config: &StoreConfig,
    ) -> Result<(), StorageError> {
        store.set(&config.theme_key, self.theme.clone())?;
        store.set(&config.dark_mode_key, self.dark_mode.to_string())
    }
}

fn read_or_warn<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, error = %err, "could not read preference");
            None
        }
    }
}
