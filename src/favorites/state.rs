use crate::favorites::item::{FavoriteId, FavoriteItem};
use crate::mvi::State;

/// Favorites in insertion order, unique by `id`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FavoritesState {
    pub favorites: Vec<FavoriteItem>,
}

impl State for FavoritesState {}

impl FavoritesState {
    pub fn has(&self, id: FavoriteId) -> bool {
        self.favorites.iter().any(|fav| fav.id == id)
    }

    pub fn get(&self, id: FavoriteId) -> Option<&FavoriteItem> {
        self.favorites.iter().find(|fav| fav.id == id)
    }

    pub fn ids(&self) -> Vec<FavoriteId> {
        self.favorites.iter().map(|fav| fav.id).collect()
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }
}
