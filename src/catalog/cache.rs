use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::Character;
use crate::storage::KeyValueStorage;

/// Durable key holding the cached character list.
pub const CACHE_STORAGE_KEY: &str = "multiversohub.cache";

#[derive(Serialize)]
struct CacheRecordRef<'a> {
    timestamp: DateTime<Utc>,
    data: &'a [Character],
}

#[derive(Deserialize)]
struct CacheRecord {
    timestamp: DateTime<Utc>,
    data: Vec<Character>,
}

/// Last successfully fetched first page, kept for offline use.
///
/// Reads and writes never fail outwardly: a missing, stale or malformed entry
/// reads as `None`.
#[derive(Clone)]
pub struct CharacterCache {
    storage: Arc<dyn KeyValueStorage>,
    ttl: Duration,
}

impl CharacterCache {
    pub fn new(storage: Arc<dyn KeyValueStorage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn with_ttl_hours(storage: Arc<dyn KeyValueStorage>, hours: u32) -> Self {
        Self::new(storage, Duration::hours(hours.into()))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn store(&self, characters: &[Character]) {
        self.store_at(characters, Utc::now()).await;
    }

    pub async fn store_at(&self, characters: &[Character], now: DateTime<Utc>) {
        let record = CacheRecordRef {
            timestamp: now,
            data: characters,
        };
        let bytes = match serde_json::to_vec(&record) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, "Error encoding character cache");
                return;
            }
        };
        if let Err(err) = self.storage.set(CACHE_STORAGE_KEY, bytes).await {
            tracing::warn!(error = %err, "Error caching characters");
        }
    }

    pub async fn load(&self) -> Option<Vec<Character>> {
        self.load_at(Utc::now()).await
    }

    /// Cached characters if the entry is younger than the TTL at `now`.
    pub async fn load_at(&self, now: DateTime<Utc>) -> Option<Vec<Character>> {
        let bytes = match self.storage.get(CACHE_STORAGE_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "Error reading character cache");
                return None;
            }
        };

        let record: CacheRecord = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "Character cache is malformed");
                return None;
            }
        };

        if now - record.timestamp > self.ttl {
            tracing::debug!(cached_at = %record.timestamp, "Character cache expired");
            return None;
        }
        Some(record.data)
    }

    pub async fn invalidate(&self) {
        if let Err(err) = self.storage.delete(CACHE_STORAGE_KEY).await {
            tracing::warn!(error = %err, "Error clearing character cache");
        }
    }
}
