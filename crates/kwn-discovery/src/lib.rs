//! Venue discovery: filtering, distance ranking and cross-view selection.
//!
//! [`DiscoveryEngine`] is the entry point. It filters the current venue
//! snapshot, ranks it by distance from the reference point, and keeps the
//! carousel, map and detail overlay pointed at the same venue through the
//! [`SelectionCoordinator`].

pub mod carousel;
pub mod engine;
pub mod filter;
pub mod geo;
pub mod location;
pub mod map;
pub mod overlay;
pub mod selection;
pub mod source;

pub use carousel::CarouselAdapter;
pub use engine::{DiscoveryEngine, EngineSettings};
pub use filter::{filter, FilterCriteria};
pub use geo::{haversine_meters, rank, RankedVenue};
pub use location::{resolve_reference_point, FixedLocation, LocationProvider};
pub use map::{Bounds, CameraFocus, MapAdapter, Marker};
pub use overlay::OverlayView;
pub use selection::{Selection, SelectionCoordinator, SelectionEvent, Surface, ViewUpdate};
pub use source::{SourceError, VenueSource, YamlVenueSource};
