//! Cross-view selection state.
//!
//! The coordinator owns the one authoritative selected venue and the
//! carousel's active index. The carousel, the map and the detail overlay
//! report user input as [`SelectionEvent`]s; the coordinator answers with the
//! [`ViewUpdate`]s the *other* surfaces need. An update is never addressed to
//! the surface an event came from, so a programmatic change on one view can
//! never bounce back into the coordinator.

use std::fmt;

use kwn_core::VenueId;

/// A presentation surface that can originate events or receive updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Carousel,
    Map,
    Overlay,
    /// Venue cards in the list view. Emits events, never receives updates.
    List,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Surface::Carousel => "carousel",
            Surface::Map => "map",
            Surface::Overlay => "overlay",
            Surface::List => "list",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A new filtered and ranked ordering replaced the previous one.
    ListReplaced(Vec<VenueId>),
    CarouselIndexChanged(usize),
    MapMarkerTapped(VenueId),
    CardActivated(VenueId),
    OverlayClosed,
}

impl SelectionEvent {
    /// Surface the event came from. `None` for data-layer events.
    #[must_use]
    pub fn origin(&self) -> Option<Surface> {
        match self {
            SelectionEvent::ListReplaced(_) => None,
            SelectionEvent::CarouselIndexChanged(_) => Some(Surface::Carousel),
            SelectionEvent::MapMarkerTapped(_) => Some(Surface::Map),
            SelectionEvent::CardActivated(_) => Some(Surface::List),
            SelectionEvent::OverlayClosed => Some(Surface::Overlay),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected { id: VenueId, active_index: usize },
}

impl Selection {
    #[must_use]
    pub fn id(&self) -> Option<&VenueId> {
        match self {
            Selection::Idle => None,
            Selection::Selected { id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        match self {
            Selection::Idle => None,
            Selection::Selected { active_index, .. } => Some(*active_index),
        }
    }
}

/// Instruction for one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    ScrollCarousel(usize),
    SelectMarker(VenueId),
    ShowOverlay(VenueId),
    HideOverlay,
}

impl ViewUpdate {
    #[must_use]
    pub fn target(&self) -> Surface {
        match self {
            ViewUpdate::ScrollCarousel(_) => Surface::Carousel,
            ViewUpdate::SelectMarker(_) => Surface::Map,
            ViewUpdate::ShowOverlay(_) | ViewUpdate::HideOverlay => Surface::Overlay,
        }
    }
}

impl fmt::Display for ViewUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewUpdate::ScrollCarousel(i) => write!(f, "carousel.scroll_to({i})"),
            ViewUpdate::SelectMarker(id) => write!(f, "map.select({id})"),
            ViewUpdate::ShowOverlay(id) => write!(f, "overlay.show({id})"),
            ViewUpdate::HideOverlay => f.write_str("overlay.hide()"),
        }
    }
}

/// Single source of truth for the selected venue.
///
/// Invariants:
/// - a selected id is always a member of the current ordering;
/// - `active_index` is always inside the carousel window;
/// - when the selection came from the carousel or landed inside the window,
///   `ordered[active_index] == id`. A map tap on a venue beyond the window is
///   the one case where the index is left pointing elsewhere.
#[derive(Debug, Clone)]
pub struct SelectionCoordinator {
    ordered: Vec<VenueId>,
    carousel_window: usize,
    selection: Selection,
    overlay: Option<VenueId>,
}

impl SelectionCoordinator {
    /// `carousel_window` is clamped to at least one slide.
    #[must_use]
    pub fn new(carousel_window: usize) -> Self {
        Self {
            ordered: Vec::new(),
            carousel_window: carousel_window.max(1),
            selection: Selection::Idle,
            overlay: None,
        }
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Venue whose detail overlay is open, if any.
    #[must_use]
    pub fn overlay(&self) -> Option<&VenueId> {
        self.overlay.as_ref()
    }

    #[must_use]
    pub fn ordered_ids(&self) -> &[VenueId] {
        &self.ordered
    }

    /// Number of slides the carousel renders.
    #[must_use]
    pub fn carousel_len(&self) -> usize {
        self.ordered.len().min(self.carousel_window)
    }

    /// Applies one event and returns the updates the other surfaces need.
    ///
    /// Events that leave the state unchanged produce no updates.
    pub fn apply(&mut self, event: SelectionEvent) -> Vec<ViewUpdate> {
        let origin = event.origin();
        let before_selection = self.selection.clone();
        let before_overlay = self.overlay.clone();

        match event {
            SelectionEvent::ListReplaced(ids) => self.replace_list(ids),
            SelectionEvent::CarouselIndexChanged(index) => self.select_index(index),
            SelectionEvent::MapMarkerTapped(id) | SelectionEvent::CardActivated(id) => {
                self.select_and_open(id);
            }
            SelectionEvent::OverlayClosed => self.overlay = None,
        }

        let updates: Vec<ViewUpdate> = self
            .diff(&before_selection, before_overlay.as_ref())
            .into_iter()
            .filter(|update| Some(update.target()) != origin)
            .collect();

        if !updates.is_empty() {
            tracing::debug!(
                origin = origin.map_or_else(|| "data".to_owned(), |s| s.to_string()),
                selected = ?self.selection.id().map(VenueId::as_str),
                active_index = ?self.selection.active_index(),
                updates = updates.len(),
                "selection changed"
            );
        }
        updates
    }

    fn replace_list(&mut self, ids: Vec<VenueId>) {
        self.ordered = ids;
        let window = self.carousel_len();

        let kept = self
            .selection
            .id()
            .and_then(|id| self.position_of(id).map(|pos| (id.clone(), pos)));

        self.selection = match (kept, self.ordered.first()) {
            (Some((id, pos)), _) => {
                let active_index = if pos < window {
                    pos
                } else {
                    self.selection
                        .active_index()
                        .filter(|&i| i < window)
                        .unwrap_or(0)
                };
                Selection::Selected { id, active_index }
            }
            (None, Some(first)) => Selection::Selected {
                id: first.clone(),
                active_index: 0,
            },
            (None, None) => Selection::Idle,
        };

        if let Some(open) = &self.overlay {
            if self.position_of(open).is_none() {
                self.overlay = None;
            }
        }
    }

    fn select_index(&mut self, index: usize) {
        if index >= self.carousel_len() {
            tracing::debug!(index, len = self.carousel_len(), "ignoring out-of-range carousel index");
            return;
        }
        self.selection = Selection::Selected {
            id: self.ordered[index].clone(),
            active_index: index,
        };
    }

    fn select_and_open(&mut self, id: VenueId) {
        let Some(pos) = self.position_of(&id) else {
            tracing::debug!(venue_id = %id, "ignoring selection of venue outside current list");
            return;
        };
        let active_index = if pos < self.carousel_len() {
            pos
        } else {
            self.selection.active_index().unwrap_or(0)
        };
        self.overlay = Some(id.clone());
        self.selection = Selection::Selected { id, active_index };
    }

    fn position_of(&self, id: &VenueId) -> Option<usize> {
        self.ordered.iter().position(|candidate| candidate == id)
    }

    fn diff(&self, before: &Selection, before_overlay: Option<&VenueId>) -> Vec<ViewUpdate> {
        let mut updates = Vec::new();

        if let Selection::Selected { id, active_index } = &self.selection {
            if before.active_index() != Some(*active_index) {
                updates.push(ViewUpdate::ScrollCarousel(*active_index));
            }
            if before.id() != Some(id) {
                updates.push(ViewUpdate::SelectMarker(id.clone()));
            }
        }

        if self.overlay.as_ref() != before_overlay {
            updates.push(match &self.overlay {
                Some(id) => ViewUpdate::ShowOverlay(id.clone()),
                None => ViewUpdate::HideOverlay,
            });
        }

        updates
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
