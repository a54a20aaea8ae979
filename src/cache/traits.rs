//! Result types handed out by the collection cache.

use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// A full collection plus where it came from.
///
/// Reads through [`crate::tracker::Repository::get_all`] never fail; a store
/// failure yields an empty `Listing` with `source == Unavailable` and the
/// error attached, so a view can show "failed to load" instead of nothing.
#[derive(Debug)]
pub struct Listing<T> {
  pub items: Vec<T>,
  pub source: ListSource,
  /// When the collection was fetched, if it was served from the cache
  pub cached_at: Option<DateTime<Utc>>,
  pub error: Option<StoreError>,
}

impl<T> Listing<T> {
  /// Freshly fetched from the store.
  pub fn from_store(items: Vec<T>) -> Self {
    Self {
      items,
      source: ListSource::Store,
      cached_at: None,
      error: None,
    }
  }

  pub fn from_cache(items: Vec<T>, cached_at: DateTime<Utc>) -> Self {
    Self {
      items,
      source: ListSource::Cache,
      cached_at: Some(cached_at),
      error: None,
    }
  }

  /// The store could not be read.
  pub fn unavailable(error: StoreError) -> Self {
    Self {
      items: Vec::new(),
      source: ListSource::Unavailable,
      cached_at: None,
      error: Some(error),
    }
  }

  pub fn is_unavailable(&self) -> bool {
    self.source == ListSource::Unavailable
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn into_items(self) -> Vec<T> {
    self.items
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
  /// Fetched from the store on this call
  Store,
  /// Served from the in-process cache
  Cache,
  /// Store failed; the collection is empty
  Unavailable,
}
