use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Remote catalog API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog API, without trailing `/character`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Which durable storage backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for the file backend. Defaults to the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Directory used by the file backend.
    ///
    /// `~/.local/share/multiverso-hub` on Linux, the platform equivalent
    /// elsewhere via `dirs::data_dir()`, or `./.multiverso-hub` as a last
    /// resort.
    pub fn resolved_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        match dirs::data_dir() {
            Some(dir) => dir.join("multiverso-hub"),
            None => PathBuf::from(".multiverso-hub"),
        }
    }
}

/// Favorites write policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Extra attempts after a failed snapshot write (default: 0, no retry).
    #[serde(default)]
    pub write_retries: u32,
    /// Base backoff in milliseconds between attempts (default: 100).
    #[serde(default = "default_retry_backoff_base_ms")]
    pub retry_backoff_base_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Maximum number of retained events (default: 100).
    #[serde(default = "default_telemetry_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long the cached character list stays fresh (default: 24).
    #[serde(default = "default_cache_ttl_hours")]
    pub ttl_hours: u32,
}

fn default_base_url() -> String {
    "https://rickandmortyapi.com/api".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_retry_backoff_base_ms() -> u64 {
    100
}

fn default_telemetry_capacity() -> usize {
    100
}

fn default_cache_ttl_hours() -> u32 {
    24
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            write_retries: 0,
            retry_backoff_base_ms: default_retry_backoff_base_ms(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            capacity: default_telemetry_capacity(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_cache_ttl_hours(),
        }
    }
}
