//! Session-scoped photo cache with request coalescing.
//!
//! Each venue moves through a small state machine:
//!
//! - **Unresolved**: no place id yet. The first request issues an identity
//!   lookup (`name + address`, biased toward the venue coordinate).
//! - **Resolved(id)**: photos are fetched per `(id, width, height, count)`
//!   key and memoized. A failed fetch is memoized as an empty list.
//! - **Unresolvable**: the lookup failed or matched nothing. Terminal for the
//!   session; requests fall back to the venue's own `images`.
//!
//! Concurrent requests for the same key share one in-flight call. Entries are
//! written once and never invalidated. Dropping a request mid-flight writes
//! nothing.

use std::collections::HashMap;

use kwn_core::{Venue, VenueId};
use tokio::sync::RwLock;

use crate::coalesce::KeyedLocks;
use crate::error::ResolveFailure;
use crate::lookup::{LookupQuery, PlaceLookup};
use crate::types::{PhotoItem, PhotoOptions};

/// Cache key for one photo list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoKey {
    pub place_id: String,
    pub max_width: u32,
    pub max_height: u32,
    pub max_count: usize,
}

impl PhotoKey {
    #[must_use]
    pub fn new(place_id: &str, options: PhotoOptions) -> Self {
        Self {
            place_id: place_id.to_owned(),
            max_width: options.max_width,
            max_height: options.max_height,
            max_count: options.max_count,
        }
    }
}

/// Identity-lookup state of a venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unresolved,
    Resolved(String),
    Unresolvable,
}

pub struct PhotoCache<L> {
    lookup: L,
    /// `None` marks a venue as unresolvable for the rest of the session.
    place_ids: RwLock<HashMap<VenueId, Option<String>>>,
    photos: RwLock<HashMap<PhotoKey, Vec<PhotoItem>>>,
    lookup_locks: KeyedLocks<VenueId>,
    fetch_locks: KeyedLocks<PhotoKey>,
}

impl<L: PlaceLookup> PhotoCache<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            place_ids: RwLock::new(HashMap::new()),
            photos: RwLock::new(HashMap::new()),
            lookup_locks: KeyedLocks::new(),
            fetch_locks: KeyedLocks::new(),
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Photos for `venue`, at most `options.max_count` of them.
    ///
    /// Never fails: lookup and fetch errors degrade to the venue's own images
    /// or to an empty list.
    pub async fn resolve_photos(&self, venue: &Venue, options: PhotoOptions) -> Vec<PhotoItem> {
        let Some(place_id) = self.resolve_place_id(venue).await else {
            return own_images(venue, options);
        };

        let key = PhotoKey::new(&place_id, options);
        if let Some(hit) = self.cached(&key).await {
            return hit;
        }

        let _guard = self.fetch_locks.acquire(&key).await;
        if let Some(hit) = self.cached(&key).await {
            tracing::debug!(
                venue_id = %venue.id,
                place_id,
                "photo request coalesced with in-flight fetch"
            );
            return hit;
        }

        let photos = match self.lookup.fetch_photos(&place_id, options).await {
            Ok(mut photos) => {
                photos.truncate(options.max_count);
                tracing::debug!(
                    venue_id = %venue.id,
                    place_id,
                    count = photos.len(),
                    "fetched venue photos"
                );
                photos
            }
            Err(err) => {
                tracing::warn!(
                    venue_id = %venue.id,
                    place_id,
                    failure = %ResolveFailure::FetchFailed,
                    error = %err,
                    "photo fetch failed, caching empty result for this session"
                );
                Vec::new()
            }
        };

        self.photos.write().await.insert(key, photos.clone());
        photos
    }

    /// Current identity-lookup state of `venue`, without issuing requests.
    pub async fn resolution_state(&self, venue: &Venue) -> Resolution {
        if let Some(id) = preset_place_id(venue) {
            return Resolution::Resolved(id.to_owned());
        }
        let state = self.place_ids.read().await.get(&venue.id).cloned();
        match state {
            None => Resolution::Unresolved,
            Some(Some(id)) => Resolution::Resolved(id),
            Some(None) => Resolution::Unresolvable,
        }
    }

    /// Number of memoized photo lists, negative entries included.
    pub async fn cached_entries(&self) -> usize {
        self.photos.read().await.len()
    }

    async fn cached(&self, key: &PhotoKey) -> Option<Vec<PhotoItem>> {
        self.photos.read().await.get(key).cloned()
    }

    async fn resolve_place_id(&self, venue: &Venue) -> Option<String> {
        if let Some(id) = preset_place_id(venue) {
            return Some(id.to_owned());
        }

        let known = self.place_ids.read().await.get(&venue.id).cloned();
        if let Some(outcome) = known {
            return outcome;
        }

        let _guard = self.lookup_locks.acquire(&venue.id).await;
        let known = self.place_ids.read().await.get(&venue.id).cloned();
        if let Some(outcome) = known {
            return outcome;
        }

        let query = LookupQuery::for_venue(venue);
        let outcome = match self.lookup.find_place_id(&query).await {
            Ok(Some(place_id)) => {
                tracing::debug!(venue_id = %venue.id, place_id, "resolved venue place id");
                Some(place_id)
            }
            Ok(None) => {
                tracing::info!(
                    venue_id = %venue.id,
                    query = query.text,
                    failure = %ResolveFailure::LookupFailed,
                    "no place matched venue, using venue images"
                );
                None
            }
            Err(err) => {
                tracing::warn!(
                    venue_id = %venue.id,
                    query = query.text,
                    failure = %ResolveFailure::LookupFailed,
                    error = %err,
                    "place lookup failed, using venue images"
                );
                None
            }
        };

        self.place_ids
            .write()
            .await
            .insert(venue.id.clone(), outcome.clone());
        outcome
    }
}

fn preset_place_id(venue: &Venue) -> Option<&str> {
    venue
        .external_place_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
}

fn own_images(venue: &Venue, options: PhotoOptions) -> Vec<PhotoItem> {
    venue
        .images
        .iter()
        .take(options.max_count)
        .map(PhotoItem::owned)
        .collect()
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
