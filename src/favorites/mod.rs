//! Favorites: a persisted, observable collection of records the user marked
//! for quick access.
//!
//! ```text
//! add/remove/toggle/clear ──→ FavoritesReducer ──→ FavoritesState ──→ subscribers
//!                                                      │
//!                                                      └──→ writer task ──→ KeyValueStorage
//! ```

mod intent;
mod item;
mod persist;
mod reducer;
mod state;
mod store;

pub use intent::FavoritesIntent;
pub use item::{FavoriteId, FavoriteItem, FavoriteItemError};
pub use persist::{PersistenceError, PersistenceStats, WritePolicy, FAVORITES_STORAGE_KEY};
pub use reducer::FavoritesReducer;
pub use state::FavoritesState;
pub use store::FavoritesStore;
