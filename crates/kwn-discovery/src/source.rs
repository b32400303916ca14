//! Where venue snapshots come from.

use std::future::Future;
use std::path::{Path, PathBuf};

use kwn_core::{ConfigError, Venue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("venue catalog error: {0}")]
    Catalog(#[from] ConfigError),

    #[error("venue source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies complete venue snapshots. Each call replaces the previous set.
pub trait VenueSource: Send + Sync {
    fn fetch_venues(&self) -> impl Future<Output = Result<Vec<Venue>, SourceError>> + Send;
}

/// Venue catalog stored as a YAML file, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct YamlVenueSource {
    path: PathBuf,
}

impl YamlVenueSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VenueSource for YamlVenueSource {
    async fn fetch_venues(&self) -> Result<Vec<Venue>, SourceError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|source| {
            ConfigError::VenuesFileIo {
                path: self.path.display().to_string(),
                source,
            }
        })?;
        let venues = kwn_core::parse_venues(&contents)?.venues;
        tracing::debug!(path = %self.path.display(), count = venues.len(), "loaded venue catalog");
        Ok(venues)
    }
}
