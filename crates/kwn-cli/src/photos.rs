//! `kwn photos`: resolve the gallery for one venue.

use std::path::Path;

use anyhow::Context;
use kwn_core::AppConfig;
use kwn_places::{PhotoCache, PhotoItem, PhotoOptions, PlacesClient, PlacesError};

pub(crate) fn options(
    config: &AppConfig,
    max_width: Option<u32>,
    max_height: Option<u32>,
    max_count: Option<usize>,
) -> PhotoOptions {
    let defaults = PhotoOptions::from_app_config(config);
    PhotoOptions {
        max_width: max_width.unwrap_or(defaults.max_width),
        max_height: max_height.unwrap_or(defaults.max_height),
        max_count: max_count.unwrap_or(defaults.max_count).max(1),
    }
}

/// Resolve and print the photos for `venue_id`.
///
/// Without an API key the venue's own images are printed instead.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the venue id is unknown,
/// or the places client cannot be constructed.
pub(crate) async fn run_photos(
    config: &AppConfig,
    venues_path: &Path,
    venue_id: &str,
    options: PhotoOptions,
) -> anyhow::Result<()> {
    let catalog = kwn_core::load_venues(venues_path)?;
    let venue = catalog
        .venues
        .into_iter()
        .find(|venue| venue.id.as_str() == venue_id)
        .ok_or_else(|| anyhow::anyhow!("venue '{venue_id}' not found in catalog"))?;

    let photos = match PlacesClient::from_app_config(config) {
        Ok(client) => PhotoCache::new(client).resolve_photos(&venue, options).await,
        Err(PlacesError::MissingApiKey) => {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set, listing venue images only");
            venue
                .images
                .iter()
                .take(options.max_count)
                .map(PhotoItem::owned)
                .collect()
        }
        Err(e) => return Err(e).context("failed to build places client"),
    };

    println!("{} [{}]", venue.name, venue.id);
    if photos.is_empty() {
        println!("  no photos");
    }
    for (i, photo) in photos.iter().enumerate() {
        println!("  {}. {}", i + 1, photo.url);
        for attribution in &photo.attributions_html {
            println!("     by {attribution}");
        }
    }
    Ok(())
}
