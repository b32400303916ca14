//! HTTP client for the places v1 REST API.
//!
//! Wraps `reqwest` with API key handling, status mapping and typed response
//! deserialization. Transient failures are retried inside a single call; the
//! photo cache decides what a final failure means for the session.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::lookup::{LookupQuery, PlaceLookup};
use crate::retry::retry_with_backoff;
use crate::types::{
    Circle, LatLng, LocationBias, PhotoItem, PhotoOptions, PlaceDetails, SearchTextRequest,
    SearchTextResponse,
};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/";
const DEFAULT_BIAS_RADIUS_M: f64 = 500.0;
const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// Client for the places REST API.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    bias_radius_m: f64,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production places API, with retries
    /// disabled.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so path segments append to the root.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| PlacesError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            bias_radius_m: DEFAULT_BIAS_RADIUS_M,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] when no key is configured, plus
    /// anything [`PlacesClient::with_base_url`] can return.
    pub fn from_app_config(config: &kwn_core::AppConfig) -> Result<Self, PlacesError> {
        let api_key = config
            .places_api_key
            .as_deref()
            .ok_or(PlacesError::MissingApiKey)?;
        Ok(Self::with_base_url(
            api_key,
            config.places_request_timeout_secs,
            &config.places_user_agent,
            &config.places_base_url,
        )?
        .with_retry(config.places_max_retries, config.places_retry_backoff_base_ms)
        .with_bias_radius(config.places_bias_radius_m))
    }

    /// Retry transient failures up to `max_retries` extra times per request.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn with_bias_radius(mut self, radius_m: f64) -> Self {
        self.bias_radius_m = radius_m;
        self
    }

    /// Text search for a single place id, biased toward the query coordinate.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::RateLimited`] / [`PlacesError::UnexpectedStatus`] after
    ///   retries are exhausted.
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn search_place_id(&self, query: &LookupQuery) -> Result<Option<String>, PlacesError> {
        let url = self.endpoint(&["v1", "places:searchText"])?;
        let body = SearchTextRequest {
            text_query: &query.text,
            max_result_count: 1,
            location_bias: LocationBias {
                circle: Circle {
                    center: LatLng {
                        latitude: query.bias.lat,
                        longitude: query.bias.lng,
                    },
                    radius: self.bias_radius_m,
                },
            },
        };

        let response: SearchTextResponse = retry_with_backoff(
            self.max_retries,
            self.backoff_base_ms,
            || {
                let request = self
                    .client
                    .post(url.clone())
                    .header(FIELD_MASK_HEADER, "places.id")
                    .json(&body);
                self.send_json(request, &url, "places:searchText")
            },
        )
        .await?;

        Ok(response
            .places
            .into_iter()
            .map(|place| place.id)
            .find(|id| !id.trim().is_empty()))
    }

    /// Fetches the photo list for `place_id` and turns each entry into a
    /// display URL sized by `options`, keeping service order.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::NotFound`] if the place id is unknown.
    /// - [`PlacesError::RateLimited`] / [`PlacesError::UnexpectedStatus`] after
    ///   retries are exhausted.
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn place_photos(
        &self,
        place_id: &str,
        options: PhotoOptions,
    ) -> Result<Vec<PhotoItem>, PlacesError> {
        let url = self.endpoint(&["v1", "places", place_id])?;
        let context = format!("places/{place_id}");

        let details: PlaceDetails =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
                let request = self
                    .client
                    .get(url.clone())
                    .header(FIELD_MASK_HEADER, "photos");
                self.send_json(request, &url, &context)
            })
            .await?;

        details
            .photos
            .into_iter()
            .take(options.max_count)
            .map(|photo| {
                Ok(PhotoItem {
                    url: self.media_url(&photo.name, options)?.to_string(),
                    attributions_html: photo
                        .author_attributions
                        .iter()
                        .map(crate::types::AuthorAttribution::to_html)
                        .collect(),
                })
            })
            .collect()
    }

    /// `{base}/v1/{photo_name}/media?maxWidthPx=..&maxHeightPx=..&key=..`
    fn media_url(&self, photo_name: &str, options: PhotoOptions) -> Result<Url, PlacesError> {
        let mut segments = vec!["v1"];
        segments.extend(photo_name.split('/').filter(|s| !s.is_empty()));
        segments.push("media");
        let mut url = self.endpoint(&segments)?;
        url.query_pairs_mut()
            .append_pair("maxWidthPx", &options.max_width.to_string())
            .append_pair("maxHeightPx", &options.max_height.to_string())
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PlacesError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PlacesError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request with the API key, maps error statuses, and parses
    /// the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        context: &str,
    ) -> Result<T, PlacesError> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PlacesError::RateLimited {
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(PlacesError::NotFound {
                url: redact_key(url),
            });
        }
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_key(url),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

impl PlaceLookup for PlacesClient {
    async fn find_place_id(&self, query: &LookupQuery) -> Result<Option<String>, PlacesError> {
        self.search_place_id(query).await
    }

    async fn fetch_photos(
        &self,
        place_id: &str,
        options: PhotoOptions,
    ) -> Result<Vec<PhotoItem>, PlacesError> {
        self.place_photos(place_id, options).await
    }
}

fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Error messages end up in logs; keep the API key out of them.
fn redact_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
