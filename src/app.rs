//! Application root: builds every shared service once and hands them out.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiError, CatalogClient};
use crate::catalog::{CatalogBrowser, CharacterCache};
use crate::config::Config;
use crate::favorites::{FavoritesStore, WritePolicy};
use crate::storage::{open_storage, KeyValueStorage};
use crate::telemetry::Telemetry;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Catalog client error: {0}")]
    Api(#[from] ApiError),
}

/// Shared services for one process.
///
/// Screens and commands receive what they need from here instead of
/// reaching for globals; tests build an `App` over their own storage.
pub struct App {
    pub config: Config,
    pub storage: Arc<dyn KeyValueStorage>,
    pub telemetry: Arc<Telemetry>,
    pub favorites: FavoritesStore,
    pub client: CatalogClient,
    pub cache: CharacterCache,
}

impl App {
    /// Opens the configured storage and restores favorites.
    pub async fn start(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        let storage = open_storage(&config.storage);
        Self::start_with_storage(config, storage).await
    }

    /// Same as [`App::start`] over an explicit storage backend.
    pub async fn start_with_storage(
        config: Config,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, AppError> {
        let telemetry = Arc::new(Telemetry::new(config.telemetry.capacity));
        let client = CatalogClient::new(&config.api)?.with_telemetry(telemetry.clone());
        let cache = CharacterCache::with_ttl_hours(storage.clone(), config.cache.ttl_hours);
        let favorites =
            FavoritesStore::restore(storage.clone(), WritePolicy::from(&config.persistence)).await;

        tracing::info!(
            storage = storage.name(),
            favorites = favorites.len(),
            api = client.base_url(),
            "Application started"
        );

        Ok(Self {
            config,
            storage,
            telemetry,
            favorites,
            client,
            cache,
        })
    }

    /// A browser over the shared client, cache and telemetry.
    pub fn browser(&self) -> CatalogBrowser {
        CatalogBrowser::new(self.client.clone())
            .with_cache(self.cache.clone())
            .with_telemetry(self.telemetry.clone())
    }

    /// Waits for pending favorites writes.
    pub async fn shutdown(&self) {
        self.favorites.flush().await;
        tracing::debug!("Application stopped");
    }
}
