//! Character listing orchestration: pagination, filter chips, name search
//! and the offline cache.

mod browser;
mod cache;
mod intent;
mod reducer;
mod state;

pub use browser::CatalogBrowser;
pub use cache::{CharacterCache, CACHE_STORAGE_KEY};
pub use intent::CatalogIntent;
pub use reducer::CatalogReducer;
pub use state::{CatalogState, CharacterFilters, Filter, ResultSource, MIN_SEARCH_LEN};
