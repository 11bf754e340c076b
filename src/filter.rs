//! Channel filtering
//!
//! Everything here is a pure function of the catalog and the filter state.
//! The caller decides when to recompute; nothing is cached.

use std::collections::{BTreeSet, HashSet};

use crate::models::{Channel, FilterState, FilterView, ALL_LANGUAGES};

/// Case-insensitive substring check; `needle` must already be lowercase
fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn matches_language(channel: &Channel, language: &str) -> bool {
    language == ALL_LANGUAGES || channel.language == language
}

/// `"All"` followed by every distinct catalog language, sorted
pub fn compute_languages(catalog: &[Channel]) -> Vec<String> {
    let distinct: BTreeSet<&str> = catalog.iter().map(|c| c.language.as_str()).collect();
    std::iter::once(ALL_LANGUAGES.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}

/// Sorted distinct groups among channels in `language`, regardless of any
/// category, search or favorites selection
pub fn compute_categories(catalog: &[Channel], language: &str) -> Vec<String> {
    let distinct: BTreeSet<&str> = catalog
        .iter()
        .filter(|c| matches_language(c, language))
        .map(|c| c.group.as_str())
        .collect();
    distinct.into_iter().map(str::to_string).collect()
}

/// Channels passing favorites-or-language, then category, then search.
/// Catalog order is preserved.
pub fn compute_visible(catalog: &[Channel], state: &FilterState) -> Vec<Channel> {
    let favorites: HashSet<&str> = state.favorites.iter().map(String::as_str).collect();
    let categories: HashSet<&str> = state.selected_categories.iter().map(String::as_str).collect();
    let query = state.search_query.to_lowercase();

    catalog
        .iter()
        .filter(|c| {
            if state.show_favorites {
                // Favorites view ignores the language selection
                favorites.contains(c.id.as_str())
            } else {
                matches_language(c, &state.selected_language)
            }
        })
        .filter(|c| categories.is_empty() || categories.contains(c.group.as_str()))
        .filter(|c| {
            query.is_empty() || contains_lowercase(&c.name, &query) || contains_lowercase(&c.group, &query)
        })
        .cloned()
        .collect()
}

/// Recompute every derived list from one consistent snapshot
pub fn recompute(catalog: &[Channel], state: &FilterState) -> FilterView {
    FilterView {
        languages: compute_languages(catalog),
        categories: compute_categories(catalog, &state.selected_language),
        visible: compute_visible(catalog, state),
    }
}

impl FilterState {
    /// Switch language. Category selection and the favorites view are reset
    /// because they may not make sense for the new language.
    pub fn set_language(&mut self, language: &str) {
        self.selected_language = language.to_string();
        self.selected_categories.clear();
        self.show_favorites = false;
    }

    pub fn toggle_category(&mut self, category: &str) {
        if self.is_category_selected(category) {
            self.selected_categories.retain(|c| c != category);
        } else {
            self.selected_categories.push(category.to_string());
        }
    }

    pub fn clear_categories(&mut self) {
        self.selected_categories.clear();
    }

    pub fn toggle_favorite(&mut self, id: &str) {
        if self.is_favorite(id) {
            self.favorites.retain(|f| f != id);
        } else {
            self.favorites.push(id.to_string());
        }
    }

    pub fn toggle_show_favorites(&mut self) {
        self.show_favorites = !self.show_favorites;
    }

    pub fn set_search(&mut self, query: &str) {
        self.search_query = query.to_string();
    }
}
