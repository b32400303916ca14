//! The two-step photo lookup protocol the cache depends on.

use std::future::Future;

use kwn_core::{Coordinate, Venue};

use crate::error::PlacesError;
use crate::types::{PhotoItem, PhotoOptions};

/// Free-text identity query biased toward a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupQuery {
    pub text: String,
    pub bias: Coordinate,
}

impl LookupQuery {
    /// `"{name} {address}"`, or just the name when the address is blank.
    #[must_use]
    pub fn for_venue(venue: &Venue) -> Self {
        let address = venue.address.trim();
        let text = if address.is_empty() {
            venue.name.trim().to_owned()
        } else {
            format!("{} {address}", venue.name.trim())
        };
        Self {
            text,
            bias: venue.coordinate,
        }
    }
}

/// External photo lookup service.
///
/// Step one maps a [`LookupQuery`] to an opaque place identifier; step two
/// returns that place's photos, in service order, with their attributions.
/// No transport is assumed.
pub trait PlaceLookup: Send + Sync {
    /// Returns `Ok(None)` when the service found no match.
    fn find_place_id(
        &self,
        query: &LookupQuery,
    ) -> impl Future<Output = Result<Option<String>, PlacesError>> + Send;

    fn fetch_photos(
        &self,
        place_id: &str,
        options: PhotoOptions,
    ) -> impl Future<Output = Result<Vec<PhotoItem>, PlacesError>> + Send;
}
