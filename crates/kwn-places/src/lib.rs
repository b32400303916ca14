//! Venue photography lookup for the discovery engine.
//!
//! Resolves a venue to an opaque place identifier, fetches a bounded set of
//! photo references for it, and memoizes the result for the session. The
//! HTTP transport lives in [`PlacesClient`]; the engine only depends on the
//! [`PlaceLookup`] trait.

pub mod cache;
pub mod client;
pub mod error;
pub mod lookup;
pub mod types;

mod coalesce;
mod retry;

pub use cache::{PhotoCache, PhotoKey, Resolution};
pub use client::PlacesClient;
pub use error::{PlacesError, ResolveFailure};
pub use lookup::{LookupQuery, PlaceLookup};
pub use types::{PhotoItem, PhotoOptions};
