use std::fmt;

use thiserror::Error;

/// Errors returned by the places HTTP client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by places service (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("place not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid places base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("no places API key configured (set GOOGLE_MAPS_API_KEY)")]
    MissingApiKey,
}

/// Why a photo resolution degraded. Never surfaced to callers; the cache
/// logs it and hands back a smaller (possibly empty) result instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveFailure {
    /// Identity lookup errored or matched nothing.
    LookupFailed,
    /// Photo detail fetch errored; cached as an empty result.
    FetchFailed,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveFailure::LookupFailed => f.write_str("lookup_failed"),
            ResolveFailure::FetchFailed => f.write_str("fetch_failed"),
        }
    }
}
