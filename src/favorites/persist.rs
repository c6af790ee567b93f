//! Snapshot persistence for the favorites store.
//!
//! Mutations enqueue [`PersistOp`]s on an unbounded channel; a single writer
//! task applies them in order. Failures are logged and counted, never
//! returned to the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::config::PersistenceConfig;
use crate::favorites::item::FavoriteItem;
use crate::storage::{KeyValueStorage, StorageError};

/// Durable key holding the favorites snapshot.
pub const FAVORITES_STORAGE_KEY: &str = "multiversohub.favorites";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read favorites snapshot: {0}")]
    ReadFailure(#[source] StorageError),

    #[error("Favorites snapshot is malformed: {0}")]
    MalformedSnapshot(#[source] serde_json::Error),

    #[error("Failed to write favorites snapshot: {0}")]
    WriteFailure(#[source] StorageError),

    #[error("Failed to encode favorites snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Retry policy for snapshot writes and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePolicy {
    /// Extra attempts after the first failure. Zero disables retrying.
    pub retries: u32,
    pub backoff_base: Duration,
}

impl WritePolicy {
    /// Single attempt, no retry.
    pub const NO_RETRY: WritePolicy = WritePolicy {
        retries: 0,
        backoff_base: Duration::from_millis(100),
    };

    fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}

impl Default for WritePolicy {
    fn default() -> Self {
        Self::NO_RETRY
    }
}

impl From<&PersistenceConfig> for WritePolicy {
    fn from(config: &PersistenceConfig) -> Self {
        Self {
            retries: config.write_retries,
            backoff_base: Duration::from_millis(config.retry_backoff_base_ms),
        }
    }
}

/// Counters of completed persistence operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistenceStats {
    pub writes_ok: u64,
    pub writes_failed: u64,
}

#[derive(Default)]
pub(crate) struct StatsCounters {
    ok: AtomicU64,
    failed: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn snapshot(&self) -> PersistenceStats {
        PersistenceStats {
            writes_ok: self.ok.load(Ordering::Relaxed),
            writes_failed: self.failed.load(Ordering::Relaxed),
        }
    }

    fn record(&self, success: bool) {
        let counter = if success { &self.ok } else { &self.failed };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub(crate) enum PersistOp {
    /// Overwrite the snapshot with the full collection.
    Write(Vec<FavoriteItem>),
    /// Remove the snapshot.
    Delete,
    /// Acknowledge once every earlier op has been applied.
    Flush { respond_to: oneshot::Sender<()> },
}

/// Reads the persisted snapshot. `Ok(None)` when nothing was ever written.
pub(crate) async fn read_snapshot(
    storage: &dyn KeyValueStorage,
) -> Result<Option<Vec<FavoriteItem>>, PersistenceError> {
    let Some(bytes) = storage
        .get(FAVORITES_STORAGE_KEY)
        .await
        .map_err(PersistenceError::ReadFailure)?
    else {
        return Ok(None);
    };

    let favorites = serde_json::from_slice(&bytes).map_err(PersistenceError::MalformedSnapshot)?;
    Ok(Some(favorites))
}

pub(crate) fn encode_snapshot(favorites: &[FavoriteItem]) -> Result<Vec<u8>, PersistenceError> {
    serde_json::to_vec(favorites).map_err(PersistenceError::Encode)
}

pub(crate) async fn writer_loop(
    storage: Arc<dyn KeyValueStorage>,
    mut ops: mpsc::UnboundedReceiver<PersistOp>,
    policy: WritePolicy,
    stats: Arc<StatsCounters>,
) {
    while let Some(op) = ops.recv().await {
        match op {
            PersistOp::Write(favorites) => {
                let count = favorites.len();
                let bytes = match encode_snapshot(&favorites) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        tracing::error!(error = %err, "Error saving favorites");
                        stats.record(false);
                        continue;
                    }
                };
                let result = with_retries(policy, "write", || {
                    storage.set(FAVORITES_STORAGE_KEY, bytes.clone())
                })
                .await;
                match result {
                    Ok(()) => {
                        tracing::debug!(count, backend = storage.name(), "Favorites snapshot saved");
                        stats.record(true);
                    }
                    Err(err) => {
                        let err = PersistenceError::WriteFailure(err);
                        tracing::warn!(error = %err, count, "Error saving favorites");
                        stats.record(false);
                    }
                }
            }
            PersistOp::Delete => {
                match with_retries(policy, "delete", || storage.delete(FAVORITES_STORAGE_KEY)).await
                {
                    Ok(()) => {
                        tracing::debug!(backend = storage.name(), "Favorites snapshot removed");
                        stats.record(true);
                    }
                    Err(err) => {
                        let err = PersistenceError::WriteFailure(err);
                        tracing::warn!(error = %err, "Error removing favorites snapshot");
                        stats.record(false);
                    }
                }
            }
            PersistOp::Flush { respond_to } => {
                let _ = respond_to.send(());
            }
        }
    }
    tracing::debug!("Favorites writer stopped");
}

async fn with_retries<F, Fut>(policy: WritePolicy, what: &str, mut op: F) -> Result<(), StorageError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<(), StorageError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(()) => return Ok(()),
            Err(err) if attempt < policy.retries => {
                let delay = policy.backoff(attempt);
                tracing::debug!(
                    error = %err,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Favorites {} failed, retrying",
                    what
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
