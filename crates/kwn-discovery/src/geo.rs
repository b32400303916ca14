//! Great-circle distance ranking.
//!
//! Venues are ordered by haversine distance from a reference point. The sort
//! is stable, so venues at equal distance (or all venues, when no reference
//! point is known) keep their input order.

use std::cmp::Ordering;

use kwn_core::{Coordinate, Venue};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedVenue {
    pub venue: Venue,
    /// `f64::INFINITY` when ranked without a reference point.
    pub distance_meters: f64,
}

/// Haversine distance between two points, in meters.
#[must_use]
pub fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h just outside [0, 1] for antipodal or coincident points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Orders `venues` by ascending distance from `reference`.
///
/// Output is a permutation of the input. Ties keep input order; NaN distances
/// sort last.
#[must_use]
pub fn rank(reference: Option<Coordinate>, venues: &[Venue]) -> Vec<RankedVenue> {
    let mut ranked: Vec<RankedVenue> = venues
        .iter()
        .map(|venue| RankedVenue {
            distance_meters: reference
                .map_or(f64::INFINITY, |r| haversine_meters(r, venue.coordinate)),
            venue: venue.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| compare_distance(a.distance_meters, b.distance_meters));
    ranked
}

fn compare_distance(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
