//! Wires the filter, ranker, selection coordinator and view adapters into one
//! browsing session.
//!
//! The engine owns the venue snapshot and the selection state. Surfaces talk
//! to it through the event methods below; every method returns the
//! [`ViewUpdate`]s that were delivered to the other surfaces so a host can
//! mirror them.

use std::sync::Arc;

use kwn_core::{AppConfig, Coordinate, Venue, VenueId};
use kwn_places::{PhotoCache, PhotoItem, PhotoOptions, PlaceLookup};

use crate::carousel::{CarouselAdapter, DEFAULT_AUTOPLAY_MS};
use crate::filter::{filter, FilterCriteria};
use crate::geo::{rank, RankedVenue};
use crate::map::MapAdapter;
use crate::overlay::OverlayView;
use crate::selection::{Selection, SelectionCoordinator, SelectionEvent, ViewUpdate};
use crate::source::VenueSource;

/// Slides in the "recommended" carousel strip.
pub const DEFAULT_CAROUSEL_WINDOW: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub carousel_window: usize,
    pub autoplay_ms: u64,
    pub photo_options: PhotoOptions,
    /// Map centre before anything is selected.
    pub map_center: Coordinate,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            carousel_window: DEFAULT_CAROUSEL_WINDOW,
            autoplay_ms: DEFAULT_AUTOPLAY_MS,
            photo_options: PhotoOptions::default(),
            map_center: Coordinate::TOKYO_STATION,
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            carousel_window: config.carousel_window,
            autoplay_ms: config.carousel_autoplay_ms,
            photo_options: PhotoOptions::from_app_config(config),
            map_center: config.fallback_reference,
        }
    }
}

pub struct DiscoveryEngine<L> {
    settings: EngineSettings,
    venues: Vec<Venue>,
    reference: Option<Coordinate>,
    criteria: FilterCriteria,
    ranked: Vec<RankedVenue>,
    coordinator: SelectionCoordinator,
    carousel: CarouselAdapter,
    map: MapAdapter,
    photos: Option<Arc<PhotoCache<L>>>,
}

impl<L: PlaceLookup> DiscoveryEngine<L> {
    /// Without a photo cache the overlay shows only the venue's own images.
    #[must_use]
    pub fn new(settings: EngineSettings, photos: Option<Arc<PhotoCache<L>>>) -> Self {
        Self {
            coordinator: SelectionCoordinator::new(settings.carousel_window),
            carousel: CarouselAdapter::new(settings.autoplay_ms),
            map: MapAdapter::new(settings.map_center),
            settings,
            venues: Vec::new(),
            reference: None,
            criteria: FilterCriteria::default(),
            ranked: Vec::new(),
            photos,
        }
    }

    /// Pulls a fresh snapshot from `source`. A failing source yields an empty
    /// snapshot.
    pub async fn refresh<S: VenueSource>(&mut self, source: &S) -> Vec<ViewUpdate> {
        let venues = match source.fetch_venues().await {
            Ok(venues) => venues,
            Err(err) => {
                tracing::warn!(error = %err, "venue source unavailable, showing no venues");
                Vec::new()
            }
        };
        self.replace_venues(venues)
    }

    /// Replaces the venue set wholesale.
    pub fn replace_venues(&mut self, venues: Vec<Venue>) -> Vec<ViewUpdate> {
        self.venues = venues;
        self.recompute()
    }

    pub fn set_reference_point(&mut self, reference: Option<Coordinate>) -> Vec<ViewUpdate> {
        self.reference = reference;
        self.recompute()
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Vec<ViewUpdate> {
        self.criteria = criteria;
        self.recompute()
    }

    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn reference_point(&self) -> Option<Coordinate> {
        self.reference
    }

    /// Every venue passing the filter, nearest first.
    #[must_use]
    pub fn ranked(&self) -> &[RankedVenue] {
        &self.ranked
    }

    /// The prefix of [`DiscoveryEngine::ranked`] shown in the carousel.
    #[must_use]
    pub fn carousel_slides(&self) -> &[RankedVenue] {
        &self.ranked[..self.coordinator.carousel_len()]
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        self.coordinator.selection()
    }

    #[must_use]
    pub fn selected_venue(&self) -> Option<&RankedVenue> {
        let id = self.coordinator.selection().id()?;
        self.find(id)
    }

    #[must_use]
    pub fn overlay_venue(&self) -> Option<&VenueId> {
        self.coordinator.overlay()
    }

    #[must_use]
    pub fn carousel(&self) -> &CarouselAdapter {
        &self.carousel
    }

    #[must_use]
    pub fn map(&self) -> &MapAdapter {
        &self.map
    }

    /// The carousel surface settled on `index`.
    pub fn carousel_index_reported(&mut self, index: usize) -> Vec<ViewUpdate> {
        let selected = self.coordinator.selection().id();
        match self.carousel.on_index_reported(index, selected) {
            Some(event) => self.dispatch(event),
            None => Vec::new(),
        }
    }

    pub fn carousel_next(&mut self) -> Vec<ViewUpdate> {
        match self.carousel.next() {
            Some(event) => self.dispatch(event),
            None => Vec::new(),
        }
    }

    pub fn carousel_prev(&mut self) -> Vec<ViewUpdate> {
        match self.carousel.prev() {
            Some(event) => self.dispatch(event),
            None => Vec::new(),
        }
    }

    /// Called by the host's timer every [`CarouselAdapter::autoplay_interval`].
    pub fn autoplay_tick(&mut self) -> Vec<ViewUpdate> {
        match self.carousel.tick() {
            Some(event) => self.dispatch(event),
            None => Vec::new(),
        }
    }

    pub fn carousel_interaction(&mut self, active: bool) {
        if active {
            self.carousel.begin_interaction();
        } else {
            self.carousel.end_interaction();
        }
    }

    pub fn map_marker_tapped(&mut self, id: &VenueId) -> Vec<ViewUpdate> {
        match self.map.tap(id) {
            Some(event) => self.dispatch(event),
            None => Vec::new(),
        }
    }

    pub fn card_activated(&mut self, id: VenueId) -> Vec<ViewUpdate> {
        self.dispatch(SelectionEvent::CardActivated(id))
    }

    pub fn overlay_closed(&mut self) -> Vec<ViewUpdate> {
        self.dispatch(SelectionEvent::OverlayClosed)
    }

    /// Detail projection of the venue whose overlay is open.
    pub async fn overlay(&self) -> Option<OverlayView> {
        let id = self.coordinator.overlay()?;
        let ranked = self.find(id)?;
        let photos = self.photos_for(&ranked.venue).await;
        Some(OverlayView::new(
            ranked.venue.clone(),
            ranked.distance_meters,
            photos,
        ))
    }

    /// Gallery photos for `venue`; empty without a photo cache.
    pub async fn photos_for(&self, venue: &Venue) -> Vec<PhotoItem> {
        match &self.photos {
            Some(cache) => cache.resolve_photos(venue, self.settings.photo_options).await,
            None => Vec::new(),
        }
    }

    fn recompute(&mut self) -> Vec<ViewUpdate> {
        let filtered = filter(&self.venues, &self.criteria);
        self.ranked = rank(self.reference, &filtered);

        let ids: Vec<VenueId> = self.ranked.iter().map(|r| r.venue.id.clone()).collect();
        let window = ids.len().min(self.settings.carousel_window.max(1));
        self.carousel.set_slides(ids[..window].to_vec());
        self.map.set_venues(&self.ranked);

        tracing::debug!(
            total = self.venues.len(),
            listed = self.ranked.len(),
            has_reference = self.reference.is_some(),
            "venue list recomputed"
        );
        self.dispatch(SelectionEvent::ListReplaced(ids))
    }

    /// Runs `event` through the coordinator and delivers the resulting
    /// updates to the owned adapters.
    fn dispatch(&mut self, event: SelectionEvent) -> Vec<ViewUpdate> {
        let updates = self.coordinator.apply(event);
        for update in &updates {
            self.carousel.apply(update);
            self.map.apply(update);
        }
        updates
    }

    fn find(&self, id: &VenueId) -> Option<&RankedVenue> {
        self.ranked.iter().find(|ranked| &ranked.venue.id == id)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
