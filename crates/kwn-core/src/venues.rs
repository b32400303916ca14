use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::venue::Venue;
use crate::ConfigError;

#[derive(Debug, Deserialize)]
pub struct VenuesFile {
    pub venues: Vec<Venue>,
}

/// Load and validate the venue catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_venues(path: &Path) -> Result<VenuesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VenuesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_venues(&content)
}

/// Parse and validate a venue catalog from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text does not parse or fails validation.
pub fn parse_venues(content: &str) -> Result<VenuesFile, ConfigError> {
    let venues_file: VenuesFile = serde_yaml::from_str(content)?;
    validate_venues(&venues_file)?;
    Ok(venues_file)
}

fn validate_venues(venues_file: &VenuesFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for venue in &venues_file.venues {
        if venue.id.as_str().trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "venue '{}' has an empty id",
                venue.name
            )));
        }

        if venue.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "venue '{}' has an empty name",
                venue.id
            )));
        }

        if !venue.coordinate.is_valid() {
            return Err(ConfigError::Validation(format!(
                "venue '{}' has invalid coordinate ({}, {})",
                venue.id, venue.coordinate.lat, venue.coordinate.lng
            )));
        }

        if !seen_ids.insert(venue.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate venue id: '{}'",
                venue.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "venues_test.rs"]
mod tests;
