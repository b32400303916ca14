//! Venue records as delivered by the venue source.
//!
//! A [`Venue`] is immutable once fetched: a new fetch replaces the whole set
//! rather than mutating records in place.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable, opaque venue identifier. Unique within a venue set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(String);

impl VenueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VenueId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for VenueId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for VenueId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A WGS84 point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Tokyo Station; the default map centre and fallback reference point.
    pub const TOKYO_STATION: Coordinate = Coordinate {
        lat: 35.681_236,
        lng: 139.767_125,
    };

    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components are finite and inside the WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Concafe,
    Girlsbar,
    Hostclub,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Concafe, Category::Girlsbar, Category::Hostclub];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Concafe => "concafe",
            Category::Girlsbar => "girlsbar",
            Category::Hostclub => "hostclub",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown venue category '{0}' (expected concafe, girlsbar or hostclub)")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concafe" => Ok(Category::Concafe),
            "girlsbar" => Ok(Category::Girlsbar),
            "hostclub" => Ok(Category::Hostclub),
            other => Err(ParseCategoryError(other.to_owned())),
        }
    }
}

/// Region a venue is listed under.
///
/// The known regions mirror the directory's area tabs; anything else the
/// data store sends is preserved verbatim in [`Area::Unlisted`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Area {
    Tokyo,
    Osaka,
    Kyoto,
    Fukuoka,
    Nagoya,
    Sendai,
    Sapporo,
    #[default]
    Other,
    Unlisted(String),
}

impl Area {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Area::Tokyo => "tokyo",
            Area::Osaka => "osaka",
            Area::Kyoto => "kyoto",
            Area::Fukuoka => "fukuoka",
            Area::Nagoya => "nagoya",
            Area::Sendai => "sendai",
            Area::Sapporo => "sapporo",
            Area::Other => "other",
            Area::Unlisted(raw) => raw,
        }
    }
}

impl From<String> for Area {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tokyo" => Area::Tokyo,
            "osaka" => Area::Osaka,
            "kyoto" => Area::Kyoto,
            "fukuoka" => Area::Fukuoka,
            "nagoya" => Area::Nagoya,
            "sendai" => Area::Sendai,
            "sapporo" => Area::Sapporo,
            "other" | "" => Area::Other,
            _ => Area::Unlisted(value),
        }
    }
}

impl From<&str> for Area {
    fn from(value: &str) -> Self {
        Area::from(value.to_owned())
    }
}

impl From<Area> for String {
    fn from(value: Area) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area constraint used by the filter engine. `"all"` disables it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AreaFilter {
    #[default]
    All,
    Only(Area),
}

impl AreaFilter {
    #[must_use]
    pub fn admits(&self, area: &Area) -> bool {
        match self {
            AreaFilter::All => true,
            AreaFilter::Only(wanted) => wanted == area,
        }
    }
}

impl FromStr for AreaFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(AreaFilter::All)
        } else {
            Ok(AreaFilter::Only(Area::from(s)))
        }
    }
}

impl fmt::Display for AreaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaFilter::All => f.write_str("all"),
            AreaFilter::Only(area) => area.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub avg: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub currency: String,
    #[serde(default)]
    pub cover_charge: Option<String>,
    #[serde(default)]
    pub avg_spend_min: Option<u32>,
    #[serde(default)]
    pub avg_spend_max: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub category: Category,
    #[serde(default)]
    pub area: Area,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub alcohol: Option<String>,
    #[serde(default)]
    pub smoking: Option<String>,
    /// Venue-owned photo URLs; may be empty.
    #[serde(default)]
    pub images: Vec<String>,
    /// Opaque photo-lookup key, when the data store already knows it.
    #[serde(default)]
    pub external_place_id: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub price: Option<PriceInfo>,
}

impl Venue {
    /// Minimal record; remaining fields start empty.
    pub fn new(
        id: impl Into<VenueId>,
        name: impl Into<String>,
        coordinate: Coordinate,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            coordinate,
            category,
            area: Area::Other,
            concept: None,
            price_range: None,
            hours: None,
            alcohol: None,
            smoking: None,
            images: Vec::new(),
            external_place_id: None,
            rating: None,
            price: None,
        }
    }

    /// Link that opens the venue's position in Google Maps.
    #[must_use]
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.coordinate.lat, self.coordinate.lng
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("GirlsBar".parse::<Category>().unwrap(), Category::Girlsbar);
        assert_eq!(" hostclub ".parse::<Category>().unwrap(), Category::Hostclub);
    }

    #[test]
    fn category_rejects_unknown_value() {
        let err = "karaoke".parse::<Category>().unwrap_err();
        assert_eq!(err, ParseCategoryError("karaoke".to_owned()));
    }

    #[test]
    fn area_round_trips_known_and_unlisted_values() {
        assert_eq!(Area::from("Osaka"), Area::Osaka);
        assert_eq!(Area::from(""), Area::Other);
        let unlisted = Area::from("okinawa");
        assert_eq!(unlisted, Area::Unlisted("okinawa".to_owned()));
        assert_eq!(String::from(unlisted), "okinawa");
    }

    #[test]
    fn area_filter_all_admits_everything() {
        let filter: AreaFilter = "ALL".parse().unwrap();
        assert!(filter.admits(&Area::Kyoto));
        assert!(filter.admits(&Area::Unlisted("okinawa".to_owned())));
    }

    #[test]
    fn area_filter_only_admits_matching_area() {
        let filter: AreaFilter = "tokyo".parse().unwrap();
        assert!(filter.admits(&Area::Tokyo));
        assert!(!filter.admits(&Area::Osaka));
    }

    #[test]
    fn coordinate_validity_checks_ranges() {
        assert!(Coordinate::TOKYO_STATION.is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn maps_url_uses_coordinate() {
        let venue = Venue::new(
            "v1",
            "Maid Dream Akiba",
            Coordinate::new(35.7, 139.77),
            Category::Concafe,
        );
        assert_eq!(
            venue.maps_url(),
            "https://www.google.com/maps/search/?api=1&query=35.7,139.77"
        );
    }

    #[test]
    fn venue_deserializes_flat_coordinate_and_defaults() {
        let json = serde_json::json!({
            "id": "akiba-01",
            "name": "Maid Dream Akiba",
            "lat": 35.6984,
            "lng": 139.7731,
            "category": "concafe",
            "area": "tokyo"
        });
        let venue: Venue = serde_json::from_value(json).unwrap();
        assert_eq!(venue.id.as_str(), "akiba-01");
        assert_eq!(venue.coordinate, Coordinate::new(35.6984, 139.7731));
        assert_eq!(venue.area, Area::Tokyo);
        assert!(venue.images.is_empty());
        assert!(venue.external_place_id.is_none());
        assert!(venue.address.is_empty());
    }
}
