use std::collections::HashSet;

use crate::favorites::intent::FavoritesIntent;
use crate::favorites::state::FavoritesState;
use crate::mvi::Reducer;

pub struct FavoritesReducer;

impl Reducer for FavoritesReducer {
    type State = FavoritesState;
    type Intent = FavoritesIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FavoritesIntent::Add { item } => {
                if state.has(item.id) {
                    return state;
                }
                let mut favorites = state.favorites;
                favorites.push(item);
                FavoritesState { favorites }
            }
            FavoritesIntent::Remove { id } => {
                let mut favorites = state.favorites;
                favorites.retain(|fav| fav.id != id);
                FavoritesState { favorites }
            }
            FavoritesIntent::Toggle { item } => {
                if state.has(item.id) {
                    Self::reduce(state, FavoritesIntent::Remove { id: item.id })
                } else {
                    Self::reduce(state, FavoritesIntent::Add { item })
                }
            }
            FavoritesIntent::Clear => FavoritesState::default(),
            FavoritesIntent::Load { favorites } => {
                // Snapshots written by other tools may repeat ids; first one wins.
                let mut seen = HashSet::with_capacity(favorites.len());
                let favorites = favorites
                    .into_iter()
                    .filter(|fav| seen.insert(fav.id))
                    .collect();
                FavoritesState { favorites }
            }
        }
    }
}
