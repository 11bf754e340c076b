//! Data models for Channel Deck

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Language value that disables the language filter
pub const ALL_LANGUAGES: &str = "All";

/// One playable live channel. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub group: String,
    pub language: String,
    pub url: String,
}

/// A remote playlist plus the language every channel in it is tagged with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSource {
    pub url: String,
    pub language: String,
}

impl PlaylistSource {
    pub fn new(url: &str, language: &str) -> Self {
        Self {
            url: url.to_string(),
            language: language.to_string(),
        }
    }
}

/// Merged, deduplicated channel list. Cloning shares the same allocation,
/// so publishing a new catalog is a single pointer swap.
pub type Catalog = Arc<[Channel]>;

/// User-controlled filter inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub selected_language: String,
    /// Kept in the order the user picked them (chip display order)
    pub selected_categories: Vec<String>,
    pub search_query: String,
    pub favorites: Vec<String>,
    pub show_favorites: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_language: ALL_LANGUAGES.to_string(),
            selected_categories: Vec::new(),
            search_query: String::new(),
            favorites: Vec::new(),
            show_favorites: false,
        }
    }
}

impl FilterState {
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }

    pub fn is_category_selected(&self, category: &str) -> bool {
        self.selected_categories.iter().any(|c| c == category)
    }
}

/// Everything derived from `(Catalog, FilterState)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterView {
    pub languages: Vec<String>,
    pub categories: Vec<String>,
    pub visible: Vec<Channel>,
}

/// Catalog loading progress shown in the header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}
