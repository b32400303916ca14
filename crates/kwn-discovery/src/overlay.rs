//! Detail overlay projection for the open venue.

use kwn_core::Venue;
use kwn_places::PhotoItem;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub venue: Venue,
    /// `None` when no reference point was known.
    pub distance_meters: Option<f64>,
    pub gallery: Vec<PhotoItem>,
    pub maps_url: String,
}

impl OverlayView {
    /// Looked-up photos win; without any, the venue's own images are shown.
    #[must_use]
    pub fn new(venue: Venue, distance_meters: f64, looked_up: Vec<PhotoItem>) -> Self {
        let gallery = if looked_up.is_empty() {
            venue.images.iter().map(PhotoItem::owned).collect()
        } else {
            looked_up
        };
        Self {
            maps_url: venue.maps_url(),
            distance_meters: distance_meters.is_finite().then_some(distance_meters),
            gallery,
            venue,
        }
    }

    /// `"850 m"` below one kilometre, `"3.2 km"` above.
    #[must_use]
    pub fn distance_label(&self) -> Option<String> {
        self.distance_meters.map(format_distance)
    }
}

#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1_000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.1} km", meters / 1_000.0)
    }
}
