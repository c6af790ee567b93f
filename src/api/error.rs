use thiserror::Error;

/// Errors returned by [`CatalogClient`](super::CatalogClient).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request to '{endpoint}' failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answers 404 both for unknown ids and for filters with no match.
    #[error("Nothing found at '{endpoint}'")]
    NotFound { endpoint: String },

    #[error("HTTP error {status} from '{endpoint}'")]
    Status { endpoint: String, status: u16 },

    #[error("Background request task failed: {0}")]
    Task(String),

    #[error("Failed to decode response from '{endpoint}': {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// HTTP status for telemetry, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
