use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::venue::Coordinate;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_num = |var: &str, default: &str| -> Result<f64, ConfigError> {
        parse_value::<f64>(var, &or_default(var, default))
    };

    let env = parse_environment(&or_default("KWN_ENV", "development"))?;
    let log_level = or_default("KWN_LOG_LEVEL", "info");
    let venues_path = PathBuf::from(or_default("KWN_VENUES_PATH", "./config/venues.yaml"));

    let places_api_key = lookup("GOOGLE_MAPS_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let places_base_url = or_default("KWN_PLACES_BASE_URL", "https://places.googleapis.com");
    let places_request_timeout_secs = parse_value::<u64>(
        "KWN_PLACES_REQUEST_TIMEOUT_SECS",
        &or_default("KWN_PLACES_REQUEST_TIMEOUT_SECS", "10"),
    )?;
    let places_user_agent = or_default("KWN_PLACES_USER_AGENT", "kwn/0.1 (venue-discovery)");
    let places_max_retries = parse_value::<u32>(
        "KWN_PLACES_MAX_RETRIES",
        &or_default("KWN_PLACES_MAX_RETRIES", "2"),
    )?;
    let places_retry_backoff_base_ms = parse_value::<u64>(
        "KWN_PLACES_RETRY_BACKOFF_BASE_MS",
        &or_default("KWN_PLACES_RETRY_BACKOFF_BASE_MS", "500"),
    )?;
    let places_bias_radius_m = parse_num("KWN_PLACES_BIAS_RADIUS_M", "500")?;
    if !(places_bias_radius_m > 0.0 && places_bias_radius_m <= 50_000.0) {
        return Err(invalid(
            "KWN_PLACES_BIAS_RADIUS_M",
            format!("{places_bias_radius_m} is outside (0, 50000]"),
        ));
    }

    let photo_max_width = parse_value::<u32>(
        "KWN_PHOTO_MAX_WIDTH",
        &or_default("KWN_PHOTO_MAX_WIDTH", "1280"),
    )?;
    let photo_max_height = parse_value::<u32>(
        "KWN_PHOTO_MAX_HEIGHT",
        &or_default("KWN_PHOTO_MAX_HEIGHT", "960"),
    )?;
    let photo_max_count = parse_value::<usize>(
        "KWN_PHOTO_MAX_COUNT",
        &or_default("KWN_PHOTO_MAX_COUNT", "6"),
    )?;
    if photo_max_count == 0 {
        return Err(invalid("KWN_PHOTO_MAX_COUNT", "must be at least 1".to_string()));
    }

    let fallback_lat = parse_num("KWN_FALLBACK_LAT", "35.681236")?;
    let fallback_lng = parse_num("KWN_FALLBACK_LNG", "139.767125")?;
    let fallback_reference = Coordinate::new(fallback_lat, fallback_lng);
    if !fallback_reference.is_valid() {
        return Err(invalid(
            "KWN_FALLBACK_LAT",
            format!("({fallback_lat}, {fallback_lng}) is not a valid coordinate"),
        ));
    }

    let geolocation_timeout_ms = parse_value::<u64>(
        "KWN_GEOLOCATION_TIMEOUT_MS",
        &or_default("KWN_GEOLOCATION_TIMEOUT_MS", "5000"),
    )?;
    let carousel_autoplay_ms = parse_value::<u64>(
        "KWN_CAROUSEL_AUTOPLAY_MS",
        &or_default("KWN_CAROUSEL_AUTOPLAY_MS", "3000"),
    )?;
    let carousel_window = parse_value::<usize>(
        "KWN_CAROUSEL_WINDOW",
        &or_default("KWN_CAROUSEL_WINDOW", "12"),
    )?;
    if carousel_window == 0 {
        return Err(invalid("KWN_CAROUSEL_WINDOW", "must be at least 1".to_string()));
    }

    Ok(AppConfig {
        env,
        log_level,
        venues_path,
        places_api_key,
        places_base_url,
        places_request_timeout_secs,
        places_user_agent,
        places_max_retries,
        places_retry_backoff_base_ms,
        places_bias_radius_m,
        photo_max_width,
        photo_max_height,
        photo_max_count,
        fallback_reference,
        geolocation_timeout_ms,
        carousel_autoplay_ms,
        carousel_window,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "KWN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
