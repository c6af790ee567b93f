use crate::api::Character;
use crate::catalog::state::CharacterFilters;
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum CatalogIntent {
    /// New filter set. Clears the search text and the loaded pages.
    FiltersChanged { filters: CharacterFilters },
    /// New search text. Clears the loaded pages.
    SearchChanged { text: String },
    /// Reset filters and search.
    Reset,
    LoadStarted,
    PageLoaded {
        page: u32,
        characters: Vec<Character>,
        has_more: bool,
        total_count: u32,
    },
    /// First page served from the offline cache.
    CacheLoaded { characters: Vec<Character> },
    LoadFailed { page: u32, message: String },
}

impl Intent for CatalogIntent {}
