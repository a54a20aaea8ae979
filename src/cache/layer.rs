//! Per-kind collection cache.

use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use super::traits::Listing;
use crate::error::StoreError;

struct Snapshot<T> {
  items: Vec<T>,
  cached_at: DateTime<Utc>,
}

/// Holds at most one full collection of a kind.
///
/// A populated cache is served until it is invalidated, or until `ttl`
/// elapses when one is configured. Concurrent misses each fetch; there is
/// no request coalescing.
pub struct CollectionCache<T> {
  slot: RwLock<Option<Snapshot<T>>>,
  ttl: Option<Duration>,
}

impl<T: Clone> CollectionCache<T> {
  pub fn new(ttl: Option<Duration>) -> Self {
    Self {
      slot: RwLock::new(None),
      ttl,
    }
  }

  fn is_expired(&self, cached_at: DateTime<Utc>) -> bool {
    match self.ttl {
      Some(ttl) => Utc::now() - cached_at > ttl,
      None => false,
    }
  }

  /// Cached items and when they were fetched, if present and not expired.
  pub fn get(&self) -> Option<(Vec<T>, DateTime<Utc>)> {
    let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
    slot
      .as_ref()
      .filter(|snapshot| !self.is_expired(snapshot.cached_at))
      .map(|snapshot| (snapshot.items.clone(), snapshot.cached_at))
  }

  pub fn store(&self, items: Vec<T>) {
    let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(Snapshot {
      items,
      cached_at: Utc::now(),
    });
  }

  pub fn invalidate(&self) {
    let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
  }

  pub fn is_populated(&self) -> bool {
    self.get().is_some()
  }

  /// Serve the cached collection, or fetch, cache and return it.
  ///
  /// A failed fetch leaves the cache untouched and returns the error.
  pub async fn fetch_list<F, Fut>(&self, fetcher: F) -> Result<Listing<T>, StoreError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, StoreError>>,
  {
    if let Some((items, cached_at)) = self.get() {
      return Ok(Listing::from_cache(items, cached_at));
    }

    let items = fetcher().await?;
    self.store(items.clone());
    Ok(Listing::from_store(items))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::ListSource;

  #[tokio::test]
  async fn test_second_fetch_served_from_cache() {
    let cache = CollectionCache::new(None);

    let first = cache.fetch_list(|| async { Ok(vec![1, 2, 3]) }).await.unwrap();
    assert_eq!(first.source, ListSource::Store);

    let second = cache.fetch_list(|| async { Ok(vec![9]) }).await.unwrap();
    assert_eq!(second.source, ListSource::Cache);
    assert_eq!(second.items, vec![1, 2, 3]);
    assert!(second.cached_at.is_some());
  }

  #[tokio::test]
  async fn test_invalidate_forces_refetch() {
    let cache = CollectionCache::new(None);
    cache.store(vec!["old"]);
    cache.invalidate();
    assert!(!cache.is_populated());

    let listing = cache.fetch_list(|| async { Ok(vec!["new"]) }).await.unwrap();
    assert_eq!(listing.items, vec!["new"]);
    assert_eq!(listing.source, ListSource::Store);
  }

  #[tokio::test]
  async fn test_failed_fetch_leaves_cache_empty() {
    let cache: CollectionCache<u8> = CollectionCache::new(None);
    let err = cache
      .fetch_list(|| async {
        Err(StoreError::Connection {
          table: "todos".to_string(),
          source: "down".into(),
        })
      })
      .await
      .unwrap_err();

    assert!(err.is_connection());
    assert!(!cache.is_populated());
  }

  #[test]
  fn test_ttl_expiry() {
    let cache = CollectionCache::new(Some(Duration::zero()));
    cache.store(vec![1]);
    std::thread::sleep(std::time::Duration::from_millis(5));
    assert!(cache.get().is_none());

    let forever = CollectionCache::new(None);
    forever.store(vec![1]);
    assert!(forever.get().is_some());
  }
}
