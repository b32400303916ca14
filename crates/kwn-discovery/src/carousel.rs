//! Carousel surface adapter.
//!
//! Tracks the slide the carousel shows, turns user swipes and autoplay steps
//! into [`SelectionEvent::CarouselIndexChanged`], and swallows the index
//! change a rendering surface reports after it was scrolled programmatically.

use std::time::Duration;

use kwn_core::VenueId;

use crate::selection::{SelectionEvent, ViewUpdate};

/// Autoplay step used when none is configured.
pub const DEFAULT_AUTOPLAY_MS: u64 = 3_000;

#[derive(Debug, Clone)]
pub struct CarouselAdapter {
    slides: Vec<VenueId>,
    position: usize,
    /// Index of a programmatic scroll the surface has not yet confirmed.
    pending_echo: Option<usize>,
    autoplay: Option<Duration>,
    interacting: bool,
}

impl CarouselAdapter {
    /// `autoplay_ms == 0` disables autoplay.
    #[must_use]
    pub fn new(autoplay_ms: u64) -> Self {
        Self {
            slides: Vec::new(),
            position: 0,
            pending_echo: None,
            autoplay: (autoplay_ms > 0).then(|| Duration::from_millis(autoplay_ms)),
            interacting: false,
        }
    }

    #[must_use]
    pub fn slides(&self) -> &[VenueId] {
        &self.slides
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn autoplay_interval(&self) -> Option<Duration> {
        self.autoplay
    }

    /// Whether the next [`CarouselAdapter::tick`] would advance.
    #[must_use]
    pub fn autoplay_active(&self) -> bool {
        self.autoplay.is_some() && !self.interacting && self.slides.len() > 1
    }

    /// Replaces the rendered slides. The position is clamped into range; the
    /// coordinator's following update moves it where it belongs.
    pub fn set_slides(&mut self, slides: Vec<VenueId>) {
        self.slides = slides;
        self.position = self.position.min(self.slides.len().saturating_sub(1));
        self.pending_echo = None;
    }

    /// Applies a coordinator update. Returns `true` if the carousel moved.
    pub fn apply(&mut self, update: &ViewUpdate) -> bool {
        match update {
            ViewUpdate::ScrollCarousel(index) if *index < self.slides.len() => {
                self.position = *index;
                self.pending_echo = Some(*index);
                true
            }
            _ => false,
        }
    }

    /// The rendering surface settled on `index`; `selected` is the venue the
    /// rest of the session currently has selected.
    ///
    /// Returns the event to forward, or `None` when the change is the echo of
    /// our own scroll or a repeat of the current position. Settling on the
    /// slide already showing still selects it when the selection has moved to
    /// a venue outside the carousel (a map tap beyond the window).
    pub fn on_index_reported(
        &mut self,
        index: usize,
        selected: Option<&VenueId>,
    ) -> Option<SelectionEvent> {
        if self.pending_echo.take() == Some(index) {
            return None;
        }
        let shown = self.slides.get(index)?;
        if index == self.position {
            return selected
                .is_some_and(|id| id != shown)
                .then_some(SelectionEvent::CarouselIndexChanged(index));
        }
        self.position = index;
        Some(SelectionEvent::CarouselIndexChanged(index))
    }

    /// One slide forward, wrapping to the first.
    pub fn next(&mut self) -> Option<SelectionEvent> {
        let count = self.slides.len();
        if count == 0 {
            return None;
        }
        self.step_to((self.position + 1) % count)
    }

    /// One slide back, wrapping to the last.
    pub fn prev(&mut self) -> Option<SelectionEvent> {
        let count = self.slides.len();
        if count == 0 {
            return None;
        }
        self.step_to((self.position + count - 1) % count)
    }

    /// Autoplay step; a no-op while disabled or paused.
    pub fn tick(&mut self) -> Option<SelectionEvent> {
        if self.autoplay_active() {
            self.next()
        } else {
            None
        }
    }

    /// Pointer entered or touch started; pauses autoplay.
    pub fn begin_interaction(&mut self) {
        self.interacting = true;
    }

    pub fn end_interaction(&mut self) {
        self.interacting = false;
    }

    fn step_to(&mut self, index: usize) -> Option<SelectionEvent> {
        if index == self.position {
            return None;
        }
        self.position = index;
        self.pending_echo = None;
        Some(SelectionEvent::CarouselIndexChanged(index))
    }
}

impl Default for CarouselAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOPLAY_MS)
    }
}
