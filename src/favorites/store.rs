use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::favorites::intent::FavoritesIntent;
use crate::favorites::item::{FavoriteId, FavoriteItem};
use crate::favorites::persist::{
    read_snapshot, writer_loop, PersistOp, PersistenceStats, StatsCounters, WritePolicy,
};
use crate::favorites::reducer::FavoritesReducer;
use crate::favorites::state::FavoritesState;
use crate::mvi::Reducer;
use crate::storage::KeyValueStorage;

/// Shared handle to the favorites collection.
///
/// Cloning is cheap; every clone sees the same collection. A handle can only
/// be obtained through [`FavoritesStore::restore`], so every command runs
/// against a store that has already loaded its snapshot.
///
/// Commands mutate memory synchronously and enqueue a snapshot write for the
/// background writer. They never fail: persistence errors are logged and the
/// in-memory collection stays authoritative for the session.
#[derive(Clone)]
pub struct FavoritesStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: watch::Sender<FavoritesState>,
    writes: mpsc::UnboundedSender<PersistOp>,
    stats: Arc<StatsCounters>,
}

impl FavoritesStore {
    /// Loads the persisted snapshot and starts the writer task.
    ///
    /// A missing snapshot yields an empty collection. An unreadable or
    /// malformed one is logged and also yields an empty collection. Must be
    /// called from within a Tokio runtime.
    pub async fn restore(storage: Arc<dyn KeyValueStorage>, policy: WritePolicy) -> Self {
        let mut state = FavoritesState::default();

        match read_snapshot(storage.as_ref()).await {
            Ok(Some(favorites)) => {
                state = FavoritesReducer::reduce(state, FavoritesIntent::Load { favorites });
                tracing::info!(
                    count = state.len(),
                    backend = storage.name(),
                    "Favorites restored"
                );
            }
            Ok(None) => {
                tracing::debug!(backend = storage.name(), "No persisted favorites");
            }
            Err(err) => {
                tracing::warn!(error = %err, "Error loading favorites, starting empty");
            }
        }

        let (state_tx, _) = watch::channel(state);
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let stats = Arc::new(StatsCounters::default());
        tokio::spawn(writer_loop(storage, write_rx, policy, stats.clone()));

        Self {
            inner: Arc::new(StoreInner {
                state: state_tx,
                writes: write_tx,
                stats,
            }),
        }
    }

    /// Appends `item` unless its id is already present.
    pub fn add(&self, item: FavoriteItem) {
        self.dispatch(FavoritesIntent::Add { item });
    }

    /// Removes the item with `id`, if present.
    pub fn remove(&self, id: FavoriteId) {
        self.dispatch(FavoritesIntent::Remove { id });
    }

    /// Removes `item` when present, adds it otherwise. Returns the new
    /// membership of `item.id`.
    pub fn toggle(&self, item: FavoriteItem) -> bool {
        let id = item.id;
        let mut now_present = false;
        self.inner.state.send_if_modified(|state| {
            let changed = self.apply(state, FavoritesIntent::Toggle { item });
            now_present = state.has(id);
            changed
        });
        now_present
    }

    /// Empties the collection and deletes the persisted snapshot.
    pub fn clear(&self) {
        self.dispatch(FavoritesIntent::Clear);
    }

    pub fn has(&self, id: FavoriteId) -> bool {
        self.inner.state.borrow().has(id)
    }

    pub fn get(&self, id: FavoriteId) -> Option<FavoriteItem> {
        self.inner.state.borrow().get(id).cloned()
    }

    /// Copy of the collection in insertion order.
    pub fn favorites(&self) -> Vec<FavoriteItem> {
        self.inner.state.borrow().favorites.clone()
    }

    pub fn snapshot(&self) -> FavoritesState {
        self.inner.state.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().is_empty()
    }

    /// Receiver notified after every mutation that changed the collection.
    pub fn subscribe(&self) -> watch::Receiver<FavoritesState> {
        self.inner.state.subscribe()
    }

    /// Waits until every write queued before this call has completed.
    pub async fn flush(&self) {
        let (respond_to, done) = oneshot::channel();
        if self
            .inner
            .writes
            .send(PersistOp::Flush { respond_to })
            .is_err()
        {
            return;
        }
        let _ = done.await;
    }

    pub fn persistence_stats(&self) -> PersistenceStats {
        self.inner.stats.snapshot()
    }

    fn dispatch(&self, intent: FavoritesIntent) {
        self.inner
            .state
            .send_if_modified(|state| self.apply(state, intent));
    }

    /// Runs the reducer and queues the matching persistence op. Called with
    /// the state lock held, so ops are queued in mutation order.
    fn apply(&self, state: &mut FavoritesState, intent: FavoritesIntent) -> bool {
        let is_clear = matches!(intent, FavoritesIntent::Clear);
        let next = FavoritesReducer::reduce(state.clone(), intent);
        let changed = next != *state;
        if changed {
            *state = next;
        }

        let op = if is_clear {
            Some(PersistOp::Delete)
        } else if changed {
            Some(PersistOp::Write(state.favorites.clone()))
        } else {
            None
        };
        if let Some(op) = op {
            if self.inner.writes.send(op).is_err() {
                tracing::warn!("Favorites writer is gone, change kept in memory only");
            }
        }

        changed
    }
}
