//! Shared domain types and configuration for the Kawaii Nights discovery engine.

pub mod app_config;
pub mod config;
pub mod venue;
pub mod venues;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use venue::{
    Area, AreaFilter, Category, Coordinate, ParseCategoryError, PriceInfo, Rating, Venue, VenueId,
};
pub use venues::{load_venues, parse_venues, VenuesFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read venues file {path}: {source}")]
    VenuesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse venues file: {0}")]
    VenuesFileParse(#[from] serde_yaml::Error),

    #[error("venue validation failed: {0}")]
    Validation(String),
}
