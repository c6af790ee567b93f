use std::sync::Arc;

use serde_json::json;

use crate::api::{ApiError, CatalogClient};
use crate::catalog::cache::CharacterCache;
use crate::catalog::intent::CatalogIntent;
use crate::catalog::reducer::CatalogReducer;
use crate::catalog::state::{CatalogState, CharacterFilters, Filter};
use crate::mvi::Reducer;
use crate::telemetry::Telemetry;

/// Drives the character listing: pagination, filters and name search.
///
/// Every state change goes through [`CatalogReducer`]; this type only runs
/// the requests and feeds their outcome back as intents.
pub struct CatalogBrowser {
    client: CatalogClient,
    cache: Option<CharacterCache>,
    telemetry: Option<Arc<Telemetry>>,
    state: CatalogState,
}

impl CatalogBrowser {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            cache: None,
            telemetry: None,
            state: CatalogState::default(),
        }
    }

    /// Enables the offline fallback for the unfiltered first page.
    pub fn with_cache(mut self, cache: CharacterCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<Telemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub async fn load_first_page(&mut self) {
        self.load_page(1).await;
    }

    /// Loads the next page when the last one reported more. Returns whether
    /// the page was loaded; a failed request leaves `last_error` set.
    pub async fn load_more(&mut self) -> bool {
        if !self.state.can_load_more() {
            return false;
        }
        let next = self.state.page + 1;
        self.load_page(next).await;
        self.state.page == next && self.state.last_error.is_none()
    }

    /// Reloads page 1 under the current filters and search.
    pub async fn refresh(&mut self) {
        self.load_page(1).await;
    }

    /// Replaces filters and search in one step and loads page 1.
    pub async fn open(&mut self, filters: CharacterFilters, search: &str) {
        self.dispatch(CatalogIntent::FiltersChanged { filters });
        self.dispatch(CatalogIntent::SearchChanged {
            text: search.to_string(),
        });
        self.load_page(1).await;
    }

    /// Toggles one filter chip, clears the search, reloads page 1.
    pub async fn toggle_filter(&mut self, filter: Filter) {
        let filters = self.state.filters.toggled(&filter);
        if let Some(telemetry) = &self.telemetry {
            telemetry.user_action("apply_filter", Some(json!({ "filter": format!("{:?}", filter) })));
        }
        self.dispatch(CatalogIntent::FiltersChanged { filters });
        self.load_page(1).await;
    }

    pub async fn clear_filters(&mut self) {
        self.dispatch(CatalogIntent::Reset);
        self.load_page(1).await;
    }

    /// Searches by name. Text shorter than
    /// [`MIN_SEARCH_LEN`](crate::catalog::MIN_SEARCH_LEN) shows the
    /// listing for the active filters instead.
    pub async fn search(&mut self, text: &str) {
        self.dispatch(CatalogIntent::SearchChanged {
            text: text.to_string(),
        });
        if let (Some(telemetry), Some(query)) = (&self.telemetry, self.state.active_search()) {
            telemetry.user_action("search", Some(json!({ "query": query })));
        }
        self.load_page(1).await;
    }

    fn dispatch(&mut self, intent: CatalogIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = CatalogReducer::reduce(state, intent);
    }

    async fn load_page(&mut self, page: u32) {
        self.dispatch(CatalogIntent::LoadStarted);
        let query = self.state.query_for_page(page);

        match self.client.list_characters(&query).await {
            Ok(result) => {
                if page == 1 && query.is_unfiltered() {
                    if let Some(cache) = &self.cache {
                        cache.store(&result.results).await;
                    }
                }
                let has_more = result.has_next();
                self.dispatch(CatalogIntent::PageLoaded {
                    page,
                    total_count: result.info.count,
                    characters: result.results,
                    has_more,
                });
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!(?query, "No characters match");
                self.dispatch(CatalogIntent::PageLoaded {
                    page,
                    characters: Vec::new(),
                    has_more: false,
                    total_count: 0,
                });
            }
            Err(err) => self.on_load_failed(page, query.is_unfiltered(), err).await,
        }
    }

    async fn on_load_failed(&mut self, page: u32, unfiltered: bool, err: ApiError) {
        tracing::warn!(page, error = %err, "Error loading characters");

        if page == 1 && unfiltered {
            if let Some(cache) = &self.cache {
                if let Some(characters) = cache.load().await {
                    tracing::info!(count = characters.len(), "Serving cached characters");
                    self.dispatch(CatalogIntent::CacheLoaded { characters });
                    return;
                }
            }
        }

        if let Some(telemetry) = &self.telemetry {
            telemetry.error("load_characters", Some(json!({ "page": page, "error": err.to_string() })));
        }
        self.dispatch(CatalogIntent::LoadFailed {
            page,
            message: err.to_string(),
        });
    }
}
