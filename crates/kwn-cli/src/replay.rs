//! `kwn replay`: drive a discovery session from the command line.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use kwn_core::{AppConfig, Coordinate, VenueId};
use kwn_discovery::{DiscoveryEngine, EngineSettings, Selection, ViewUpdate, YamlVenueSource};
use kwn_places::{PhotoCache, PlaceLookup, PlacesClient, PlacesError};

/// One scripted surface interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReplayStep {
    /// The carousel surface settled on this slide.
    Swipe(usize),
    Tap(VenueId),
    Card(VenueId),
    Close,
    Next,
    Prev,
    /// One autoplay interval elapsed.
    Tick,
}

#[derive(Debug, thiserror::Error)]
#[error(
    "invalid replay step '{0}' (expected swipe:<index>, tap:<id>, card:<id>, close, next, prev or tick)"
)]
pub(crate) struct ParseStepError(String);

impl FromStr for ReplayStep {
    type Err = ParseStepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseStepError(s.to_owned());
        let (verb, arg) = match s.trim().split_once(':') {
            Some((verb, arg)) => (verb, Some(arg.trim())),
            None => (s.trim(), None),
        };

        match (verb.to_ascii_lowercase().as_str(), arg) {
            ("swipe", Some(index)) => index.parse().map(ReplayStep::Swipe).map_err(|_| invalid()),
            ("tap", Some(id)) if !id.is_empty() => Ok(ReplayStep::Tap(VenueId::from(id))),
            ("card", Some(id)) if !id.is_empty() => Ok(ReplayStep::Card(VenueId::from(id))),
            ("close", None) => Ok(ReplayStep::Close),
            ("next", None) => Ok(ReplayStep::Next),
            ("prev", None) => Ok(ReplayStep::Prev),
            ("tick", None) => Ok(ReplayStep::Tick),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayStep::Swipe(index) => write!(f, "swipe:{index}"),
            ReplayStep::Tap(id) => write!(f, "tap:{id}"),
            ReplayStep::Card(id) => write!(f, "card:{id}"),
            ReplayStep::Close => f.write_str("close"),
            ReplayStep::Next => f.write_str("next"),
            ReplayStep::Prev => f.write_str("prev"),
            ReplayStep::Tick => f.write_str("tick"),
        }
    }
}

pub(crate) fn apply_step<L: PlaceLookup>(
    engine: &mut DiscoveryEngine<L>,
    step: &ReplayStep,
) -> Vec<ViewUpdate> {
    match step {
        ReplayStep::Swipe(index) => engine.carousel_index_reported(*index),
        ReplayStep::Tap(id) => engine.map_marker_tapped(id),
        ReplayStep::Card(id) => engine.card_activated(id.clone()),
        ReplayStep::Close => engine.overlay_closed(),
        ReplayStep::Next => engine.carousel_next(),
        ReplayStep::Prev => engine.carousel_prev(),
        ReplayStep::Tick => engine.autoplay_tick(),
    }
}

/// Load the catalog, apply `steps` in order and print the state after each.
///
/// # Errors
///
/// Returns an error if a configured places client cannot be constructed.
/// An unreadable catalog is logged and replayed as an empty venue list.
pub(crate) async fn run_replay(
    config: &AppConfig,
    venues_path: &Path,
    reference: Option<Coordinate>,
    steps: &[ReplayStep],
) -> anyhow::Result<()> {
    let photos = match PlacesClient::from_app_config(config) {
        Ok(client) => Some(Arc::new(PhotoCache::new(client))),
        Err(PlacesError::MissingApiKey) => None,
        Err(e) => return Err(e).context("failed to build places client"),
    };

    let mut engine = DiscoveryEngine::new(EngineSettings::from_app_config(config), photos);
    engine.set_reference_point(reference);
    let updates = engine.refresh(&YamlVenueSource::new(venues_path)).await;
    println!(
        "load: {} venues, {} in carousel",
        engine.ranked().len(),
        engine.carousel_slides().len()
    );
    print_state(&engine, &updates);

    for step in steps {
        let updates = apply_step(&mut engine, step);
        println!("{step}:");
        print_state(&engine, &updates);

        let opened = updates
            .iter()
            .any(|update| matches!(update, ViewUpdate::ShowOverlay(_)));
        if opened {
            if let Some(view) = engine.overlay().await {
                println!(
                    "  overlay: {} ({}) {} photos, {}",
                    view.venue.name,
                    view.distance_label().unwrap_or_else(|| "-".to_owned()),
                    view.gallery.len(),
                    view.maps_url
                );
            }
        }
    }
    Ok(())
}

fn print_state<L: PlaceLookup>(engine: &DiscoveryEngine<L>, updates: &[ViewUpdate]) {
    println!("  state: {}", describe(engine.selection(), engine.overlay_venue()));
    for update in updates {
        println!("  -> {update}");
    }
}

pub(crate) fn describe(selection: &Selection, overlay: Option<&VenueId>) -> String {
    let overlay = overlay.map_or("-", VenueId::as_str);
    match selection {
        Selection::Idle => format!("idle overlay={overlay}"),
        Selection::Selected { id, active_index } => {
            format!("selected={id} index={active_index} overlay={overlay}")
        }
    }
}
