use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::task::JoinSet;

use crate::api::error::ApiError;
use crate::api::types::{
    Character, CharacterPage, CharacterQuery, Episode, StatusBreakdown, StatusFilter,
};
use crate::config::ApiConfig;
use crate::telemetry::Telemetry;

/// Read-only client for the character catalog API.
///
/// Cheap to clone; clones share the connection pool and telemetry buffer.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    telemetry: Option<Arc<Telemetry>>,
}

impl CatalogClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            telemetry: None,
        })
    }

    /// Records every call in `telemetry`.
    pub fn with_telemetry(mut self, telemetry: Arc<Telemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /character` with the query's page, name and filters.
    pub async fn list_characters(&self, query: &CharacterQuery) -> Result<CharacterPage, ApiError> {
        let url = self.endpoint_url("character", &query.to_pairs())?;
        self.get_json(url).await
    }

    /// `GET /character/{id}`.
    pub async fn character(&self, id: i64) -> Result<Character, ApiError> {
        let url = self.endpoint_url(&format!("character/{}", id), &[])?;
        self.get_json(url).await
    }

    /// First page of characters with the given status.
    pub async fn characters_by_status(&self, status: StatusFilter) -> Result<CharacterPage, ApiError> {
        let query = CharacterQuery {
            status: Some(status),
            ..CharacterQuery::default()
        };
        self.list_characters(&query).await
    }

    /// Fetches an episode by its absolute resource URL.
    pub async fn episode(&self, url: &str) -> Result<Episode, ApiError> {
        let url = Url::parse(url).map_err(|e| ApiError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        self.get_json(url).await
    }

    /// Fetches all `urls` concurrently. The result keeps the input order;
    /// the first failure aborts the rest.
    pub async fn episodes(&self, urls: &[String]) -> Result<Vec<Episode>, ApiError> {
        let mut tasks = JoinSet::new();
        for (index, url) in urls.iter().enumerate() {
            let client = self.clone();
            let url = url.clone();
            tasks.spawn(async move { (index, client.episode(&url).await) });
        }

        let mut slots: Vec<Option<Episode>> = vec![None; urls.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|e| ApiError::Task(e.to_string()))?;
            slots[index] = Some(result?);
        }
        Ok(slots.into_iter().flatten().collect())
    }

    /// Total character count plus counts per status, fetched concurrently.
    pub async fn status_breakdown(&self) -> Result<StatusBreakdown, ApiError> {
        let (total, alive, dead, unknown) = tokio::try_join!(
            self.count(CharacterQuery::default()),
            self.count_by_status(StatusFilter::Alive),
            self.count_by_status(StatusFilter::Dead),
            self.count_by_status(StatusFilter::Unknown),
        )?;
        Ok(StatusBreakdown {
            total,
            alive,
            dead,
            unknown,
        })
    }

    async fn count_by_status(&self, status: StatusFilter) -> Result<u32, ApiError> {
        count_of(self.characters_by_status(status).await)
    }

    async fn count(&self, query: CharacterQuery) -> Result<u32, ApiError> {
        count_of(self.list_characters(&query).await)
    }

    fn endpoint_url(&self, path: &str, pairs: &[(&'static str, String)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let endpoint = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let started = Instant::now();
        let result = self.fetch(&endpoint, url).await;
        self.record(&endpoint, &result, started.elapsed());
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, url: Url) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                endpoint: endpoint.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    fn record<T>(&self, endpoint: &str, result: &Result<T, ApiError>, elapsed: Duration) {
        let latency_ms = elapsed.as_millis() as u64;
        match result {
            Ok(_) => tracing::debug!(endpoint, latency_ms, "Catalog request succeeded"),
            Err(err) if err.is_not_found() => {
                tracing::debug!(endpoint, latency_ms, "Catalog request found nothing")
            }
            Err(err) => tracing::warn!(endpoint, latency_ms, error = %err, "Catalog request failed"),
        }

        if let Some(telemetry) = &self.telemetry {
            let details = match result {
                Ok(_) => json!({ "latency_ms": latency_ms }),
                Err(err) => json!({
                    "latency_ms": latency_ms,
                    "status": err.status(),
                    "error": err.to_string(),
                }),
            };
            telemetry.api_call(endpoint, result.is_ok(), Some(details));
        }
    }
}

/// A 404 from a listing means nothing matched.
fn count_of(result: Result<CharacterPage, ApiError>) -> Result<u32, ApiError> {
    match result {
        Ok(page) => Ok(page.info.count),
        Err(err) if err.is_not_found() => Ok(0),
        Err(err) => Err(err),
    }
}
