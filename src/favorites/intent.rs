use crate::favorites::item::{FavoriteId, FavoriteItem};
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum FavoritesIntent {
    /// Append unless an item with the same id is already present.
    Add { item: FavoriteItem },
    /// Drop the item with this id, if any.
    Remove { id: FavoriteId },
    /// Remove when present, append otherwise.
    Toggle { item: FavoriteItem },
    Clear,
    /// Replace the collection with a restored snapshot.
    Load { favorites: Vec<FavoriteItem> },
}

impl Intent for FavoritesIntent {}
