use crate::api::{Character, CharacterQuery, GenderFilter, StatusFilter};
use crate::mvi::State;

/// Searches shorter than this fall back to the unsearched listing.
pub const MIN_SEARCH_LEN: usize = 2;

/// Active status/species/gender filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterFilters {
    pub status: Option<StatusFilter>,
    pub species: Option<String>,
    pub gender: Option<GenderFilter>,
}

impl CharacterFilters {
    pub fn is_active(&self) -> bool {
        self.status.is_some() || self.species.is_some() || self.gender.is_some()
    }

    /// Returns the filters with `filter` toggled: selecting the active value
    /// again clears it.
    pub fn toggled(&self, filter: &Filter) -> Self {
        let mut next = self.clone();
        match filter {
            Filter::Status(status) => {
                next.status = if self.status == Some(*status) {
                    None
                } else {
                    Some(*status)
                };
            }
            Filter::Species(species) => {
                let same = self
                    .species
                    .as_deref()
                    .is_some_and(|current| current.eq_ignore_ascii_case(species));
                next.species = if same || species.trim().is_empty() {
                    None
                } else {
                    Some(species.trim().to_string())
                };
            }
            Filter::Gender(gender) => {
                next.gender = if self.gender == Some(*gender) {
                    None
                } else {
                    Some(*gender)
                };
            }
        }
        next
    }
}

/// A single filter chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Status(StatusFilter),
    Species(String),
    Gender(GenderFilter),
}

/// Where the listed characters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultSource {
    #[default]
    Remote,
    /// Served from the offline cache after a network failure.
    Cache,
}

/// State of the character listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogState {
    pub characters: Vec<Character>,
    /// Last page loaded, 0 before the first load.
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub filters: CharacterFilters,
    pub search: String,
    /// Total matches reported by the API for the current query.
    pub total_count: Option<u32>,
    pub source: ResultSource,
    pub last_error: Option<String>,
}

impl State for CatalogState {}

impl CatalogState {
    /// The search text, when long enough to be applied.
    pub fn active_search(&self) -> Option<&str> {
        let trimmed = self.search.trim();
        (trimmed.chars().count() >= MIN_SEARCH_LEN).then_some(trimmed)
    }

    pub fn is_searching(&self) -> bool {
        self.active_search().is_some()
    }

    pub fn can_load_more(&self) -> bool {
        !self.loading && self.has_more && self.source == ResultSource::Remote
    }

    /// API query for `page` under the current filters and search.
    pub fn query_for_page(&self, page: u32) -> CharacterQuery {
        CharacterQuery {
            page: Some(page),
            name: self.active_search().map(str::to_string),
            status: self.filters.status,
            species: self.filters.species.clone(),
            gender: self.filters.gender,
        }
    }
}
