//! Persisted viewer preferences
//!
//! The persisted slot is a single JSON document under one key. Reading merges
//! whatever is found over the defaults one field at a time, so a corrupt
//! field never throws away the others. Storage failures are logged and
//! otherwise ignored.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::{FilterState, ALL_LANGUAGES};

pub const PREFS_KEY: &str = "channel_deck_prefs_v1";

/// Minimal key-value slot the preferences live in
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per key inside a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub selected_language: String,
    pub selected_categories: Vec<String>,
    pub search_query: String,
    pub favorites: Vec<String>,
    pub show_favorites: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        FilterState::default().into()
    }
}

impl From<&FilterState> for Preferences {
    fn from(state: &FilterState) -> Self {
        Self {
            selected_language: state.selected_language.clone(),
            selected_categories: state.selected_categories.clone(),
            search_query: state.search_query.clone(),
            favorites: state.favorites.clone(),
            show_favorites: state.show_favorites,
        }
    }
}

impl From<FilterState> for Preferences {
    fn from(state: FilterState) -> Self {
        (&state).into()
    }
}

impl From<Preferences> for FilterState {
    fn from(prefs: Preferences) -> Self {
        Self {
            selected_language: prefs.selected_language,
            selected_categories: prefs.selected_categories,
            search_query: prefs.search_query,
            favorites: prefs.favorites,
            show_favorites: prefs.show_favorites,
        }
    }
}

impl Preferences {
    /// Build from a parsed document, defaulting each field that is missing
    /// or has the wrong shape
    fn from_object(obj: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            selected_language: field::<String>(obj, "selectedLanguage")
                .filter(|lang| !lang.is_empty())
                .unwrap_or(defaults.selected_language),
            selected_categories: field(obj, "selectedCategories")
                .map(dedup_in_order)
                .unwrap_or(defaults.selected_categories),
            search_query: field(obj, "searchQuery").unwrap_or(defaults.search_query),
            favorites: field(obj, "favorites")
                .map(dedup_in_order)
                .unwrap_or(defaults.favorites),
            show_favorites: field(obj, "showFavorites").unwrap_or(defaults.show_favorites),
        }
    }
}

/// Stored lists are sets; keep the first occurrence of each entry
fn dedup_in_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(v.clone())).collect()
}

fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    obj.get(key)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

/// Loads and saves [`Preferences`] through any [`KeyValueStore`]
pub struct PreferenceStore {
    store: Box<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Never fails; anything unreadable yields defaults
    pub fn load(&self) -> Preferences {
        let raw = match self.store.get(PREFS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Preferences::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read preferences");
                return Preferences::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(obj)) => Preferences::from_object(&obj),
            Ok(_) | Err(_) => {
                debug!("Stored preferences are not a JSON object, using defaults");
                Preferences::default()
            }
        }
    }

    /// Full overwrite of the slot; failures are dropped
    pub fn save(&self, prefs: &Preferences) {
        let result = serde_json::to_string(prefs)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(PREFS_KEY, &json));

        match result {
            Ok(()) => debug!("Preferences saved"),
            Err(e) => warn!(error = %e, "Failed to save preferences"),
        }
    }
}
