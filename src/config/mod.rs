//! TOML configuration: API endpoint, storage backend, persistence policy,
//! telemetry and cache settings.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    ApiConfig, CacheConfig, Config, PersistenceConfig, StorageBackend, StorageConfig,
    TelemetryConfig,
};
