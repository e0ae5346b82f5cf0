//! Typed access to the persisted saved-locations list and theme preference.

use std::sync::Arc;

use wetter_core::{StorageError, ThemeMode};

use crate::saved::normalize_saved;
use crate::store::KeyValueStore;

/// Storage key of the JSON-encoded saved-locations list
pub const SAVED_LOCATIONS_KEY: &str = "@saved_locations";
/// Storage key of the theme preference ("light" / "dark")
pub const THEME_MODE_KEY: &str = "@theme_mode";

#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the saved-locations list. Missing or unreadable data yields an empty list.
    pub fn load_saved(&self) -> Vec<String> {
        let raw = match self.store.get(SAVED_LOCATIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read saved locations: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) => normalize_saved(&list),
            Err(e) => {
                tracing::warn!("Ignoring malformed saved locations: {}", e);
                Vec::new()
            }
        }
    }

    pub fn store_saved(&self, saved: &[String]) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(saved).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(SAVED_LOCATIONS_KEY, &json)
    }

    /// Load the theme preference, falling back to `default` when unset or unknown
    pub fn load_theme(&self, default: ThemeMode) -> ThemeMode {
        match self.store.get(THEME_MODE_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                tracing::debug!("Unknown theme mode {:?}, using {}", raw, default);
                default
            }),
            Ok(None) => default,
            Err(e) => {
                tracing::warn!("Failed to read theme mode: {}", e);
                default
            }
        }
    }

    pub fn store_theme(&self, theme: ThemeMode) -> Result<(), StorageError> {
        self.store.set(THEME_MODE_KEY, theme.as_str())
    }
}
