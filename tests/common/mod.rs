//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_api;

use async_trait::async_trait;
use multiverso::app::App;
use multiverso::config::{Config, StorageBackend};
use multiverso::favorites::{FavoriteItem, FavoritesStore, WritePolicy};
use multiverso::storage::{KeyValueStorage, MemoryStorage, StorageError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// A favorite shaped like a catalog character.
pub fn character_item(id: i64, name: &str) -> FavoriteItem {
    FavoriteItem::new(id)
        .with_field("name", name)
        .with_field("status", "Alive")
        .with_field("species", "Human")
}

/// Store over a fresh in-memory backend, returned alongside the backend.
pub async fn memory_store() -> (FavoritesStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let store = FavoritesStore::restore(storage.clone(), WritePolicy::NO_RETRY).await;
    (store, storage)
}

/// Config pointing at `base_url` with file storage under `dir`.
pub fn test_config(base_url: &str, dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_seconds = 5;
    config.api.connect_timeout_seconds = 2;
    config.storage.backend = StorageBackend::File;
    config.storage.dir = Some(dir.to_path_buf());
    config
}

/// Create a temporary config file pointing at `base_url`, storing data in
/// the same temp dir.
pub fn temp_config_file(base_url: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    let data_dir = temp_dir.path().join("data");

    let content = format!(
        r#"[api]
base_url = "{}"
timeout_seconds = 5
connect_timeout_seconds = 2

[storage]
backend = "file"
dir = "{}"
"#,
        base_url,
        data_dir.display().to_string().replace('\\', "\\\\")
    );

    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// App over the mock API and a temp dir.
pub async fn start_app(base_url: &str, dir: &std::path::Path) -> App {
    App::start(test_config(base_url, dir))
        .await
        .expect("app should start")
}

/// Poll `check` until it holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}

// -- Storage doubles ----------------------------------------------------------

/// Storage wrapper that can be told to fail reads, writes or deletes.
///
/// Wraps a [`MemoryStorage`] so successful operations behave normally.
#[derive(Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_reads: AtomicBool,
    /// Number of upcoming `set`/`delete` calls that fail. `u32::MAX` means
    /// every call fails.
    failing_writes: AtomicU32,
    write_attempts: AtomicU32,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_all_writes(&self) {
        self.failing_writes.store(u32::MAX, Ordering::SeqCst);
    }

    pub fn fail_next_writes(&self, count: u32) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.failing_writes.store(0, Ordering::SeqCst);
        self.fail_reads.store(false, Ordering::SeqCst);
    }

    pub fn write_attempts(&self) -> u32 {
        self.write_attempts.load(Ordering::SeqCst)
    }

    /// Writes straight to the wrapped storage, bypassing failure injection.
    pub async fn seed(&self, key: &str, value: &[u8]) {
        self.inner.set(key, value.to_vec()).await.unwrap();
    }

    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.get(key).await.unwrap()
    }

    fn injected(key: &str) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            path: PathBuf::from("/dev/full"),
            source: std::io::Error::other("injected failure"),
        }
    }

    fn take_write_failure(&self) -> bool {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_writes.load(Ordering::SeqCst);
        match remaining {
            0 => false,
            u32::MAX => true,
            n => {
                self.failing_writes.store(n - 1, Ordering::SeqCst);
                true
            }
        }
    }
}

#[async_trait]
impl KeyValueStorage for FailingStorage {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected(key));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        if self.take_write_failure() {
            return Err(Self::injected(key));
        }
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.take_write_failure() {
            return Err(Self::injected(key));
        }
        self.inner.delete(key).await
    }
}

/// Storage whose writes take `delay` each, to expose ordering bugs.
pub struct SlowStorage {
    inner: MemoryStorage,
    delay: Duration,
}

impl SlowStorage {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStorage::new(),
            delay,
        }
    }
}

#[async_trait]
impl KeyValueStorage for SlowStorage {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(key).await
    }
}
