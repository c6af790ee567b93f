use crate::catalog::intent::CatalogIntent;
use crate::catalog::state::{CatalogState, ResultSource};
use crate::mvi::Reducer;

pub struct CatalogReducer;

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Intent = CatalogIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            CatalogIntent::FiltersChanged { filters } => CatalogState {
                filters,
                search: String::new(),
                ..cleared(state)
            },
            CatalogIntent::SearchChanged { text } => CatalogState {
                search: text,
                ..cleared(state)
            },
            CatalogIntent::Reset => CatalogState {
                filters: Default::default(),
                search: String::new(),
                ..cleared(state)
            },
            CatalogIntent::LoadStarted => CatalogState {
                loading: true,
                last_error: None,
                ..state
            },
            CatalogIntent::PageLoaded {
                page,
                characters,
                has_more,
                total_count,
            } => {
                let characters = if page > 1 {
                    let mut all = state.characters;
                    all.extend(characters);
                    all
                } else {
                    characters
                };
                CatalogState {
                    characters,
                    page,
                    has_more,
                    loading: false,
                    total_count: Some(total_count),
                    source: ResultSource::Remote,
                    last_error: None,
                    ..state
                }
            }
            CatalogIntent::CacheLoaded { characters } => CatalogState {
                total_count: Some(characters.len() as u32),
                characters,
                page: 1,
                has_more: false,
                loading: false,
                source: ResultSource::Cache,
                last_error: None,
                ..state
            },
            CatalogIntent::LoadFailed { page, message } => {
                if page > 1 {
                    // Keep what was already listed; only the next page failed.
                    CatalogState {
                        loading: false,
                        last_error: Some(message),
                        ..state
                    }
                } else {
                    CatalogState {
                        characters: Vec::new(),
                        page: 0,
                        has_more: false,
                        loading: false,
                        total_count: None,
                        last_error: Some(message),
                        ..state
                    }
                }
            }
        }
    }
}

/// Drops loaded results, keeping filters and search.
fn cleared(state: CatalogState) -> CatalogState {
    CatalogState {
        characters: Vec::new(),
        page: 0,
        has_more: false,
        loading: false,
        total_count: None,
        source: ResultSource::Remote,
        last_error: None,
        ..state
    }
}
