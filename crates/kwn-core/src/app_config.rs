use std::path::PathBuf;

use crate::venue::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub venues_path: PathBuf,
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub places_request_timeout_secs: u64,
    pub places_user_agent: String,
    pub places_max_retries: u32,
    pub places_retry_backoff_base_ms: u64,
    /// Radius of the location-bias circle sent with identity lookups.
    pub places_bias_radius_m: f64,
    pub photo_max_width: u32,
    pub photo_max_height: u32,
    pub photo_max_count: usize,
    /// Reference point used when geolocation does not answer in time.
    pub fallback_reference: Coordinate,
    pub geolocation_timeout_ms: u64,
    /// `0` disables carousel autoplay.
    pub carousel_autoplay_ms: u64,
    pub carousel_window: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("venues_path", &self.venues_path)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field(
                "places_request_timeout_secs",
                &self.places_request_timeout_secs,
            )
            .field("places_user_agent", &self.places_user_agent)
            .field("places_max_retries", &self.places_max_retries)
            .field(
                "places_retry_backoff_base_ms",
                &self.places_retry_backoff_base_ms,
            )
            .field("places_bias_radius_m", &self.places_bias_radius_m)
            .field("photo_max_width", &self.photo_max_width)
            .field("photo_max_height", &self.photo_max_height)
            .field("photo_max_count", &self.photo_max_count)
            .field("fallback_reference", &self.fallback_reference)
            .field("geolocation_timeout_ms", &self.geolocation_timeout_ms)
            .field("carousel_autoplay_ms", &self.carousel_autoplay_ms)
            .field("carousel_window", &self.carousel_window)
            .finish()
    }
}
