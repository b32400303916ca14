//! Map surface adapter: marker projection, fit bounds and camera focus.

use kwn_core::{Category, Coordinate, VenueId};

use crate::geo::RankedVenue;
use crate::selection::{SelectionEvent, ViewUpdate};

/// Zoom used before any venue is focused.
pub const DEFAULT_ZOOM: u8 = 12;
/// Minimum zoom when focusing a selected marker.
pub const FOCUS_ZOOM: u8 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: VenueId,
    pub title: String,
    pub category: Category,
    pub position: Coordinate,
}

/// Axis-aligned box that contains every marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFocus {
    pub center: Coordinate,
    pub zoom: u8,
}

#[derive(Debug, Clone)]
pub struct MapAdapter {
    markers: Vec<Marker>,
    selected: Option<VenueId>,
    camera: CameraFocus,
}

impl MapAdapter {
    #[must_use]
    pub fn new(center: Coordinate) -> Self {
        Self {
            markers: Vec::new(),
            selected: None,
            camera: CameraFocus {
                center,
                zoom: DEFAULT_ZOOM,
            },
        }
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn selected(&self) -> Option<&VenueId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn camera(&self) -> CameraFocus {
        self.camera
    }

    /// Rebuilds markers from the ranked list. Venues with unusable
    /// coordinates get no marker. A selection whose marker disappeared is
    /// dropped.
    pub fn set_venues(&mut self, venues: &[RankedVenue]) {
        self.markers = venues
            .iter()
            .filter(|ranked| ranked.venue.coordinate.is_valid())
            .map(|ranked| Marker {
                id: ranked.venue.id.clone(),
                title: ranked.venue.name.clone(),
                category: ranked.venue.category,
                position: ranked.venue.coordinate,
            })
            .collect();

        if let Some(selected) = &self.selected {
            if self.marker(selected).is_none() {
                self.selected = None;
            }
        }
    }

    /// Smallest box containing every marker; `None` without markers.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.markers.first()?.position;
        let init = Bounds {
            south_west: first,
            north_east: first,
        };
        Some(self.markers.iter().fold(init, |acc, marker| Bounds {
            south_west: Coordinate::new(
                acc.south_west.lat.min(marker.position.lat),
                acc.south_west.lng.min(marker.position.lng),
            ),
            north_east: Coordinate::new(
                acc.north_east.lat.max(marker.position.lat),
                acc.north_east.lng.max(marker.position.lng),
            ),
        }))
    }

    /// Applies a coordinator update. Returns the new camera when it moved.
    ///
    /// Selecting a venue that has no marker clears the highlight and leaves
    /// the camera where it is.
    pub fn apply(&mut self, update: &ViewUpdate) -> Option<CameraFocus> {
        match update {
            ViewUpdate::SelectMarker(id) => {
                let focus = self.focus(id);
                if focus.is_none() {
                    self.selected = None;
                }
                focus
            }
            _ => None,
        }
    }

    /// A marker was tapped. The map focuses it locally; unknown ids produce
    /// no event.
    pub fn tap(&mut self, id: &VenueId) -> Option<SelectionEvent> {
        self.focus(id)?;
        Some(SelectionEvent::MapMarkerTapped(id.clone()))
    }

    /// Pans to the marker and zooms in to at least [`FOCUS_ZOOM`].
    fn focus(&mut self, id: &VenueId) -> Option<CameraFocus> {
        let position = self.marker(id)?.position;
        self.selected = Some(id.clone());
        self.camera = CameraFocus {
            center: position,
            zoom: self.camera.zoom.max(FOCUS_ZOOM),
        };
        Some(self.camera)
    }

    fn marker(&self, id: &VenueId) -> Option<&Marker> {
        self.markers.iter().find(|marker| &marker.id == id)
    }
}
