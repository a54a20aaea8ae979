use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::cache::{CollectionCache, Listing};
use crate::error::StoreError;
use crate::records::Entity;
use crate::store::RecordStore;

/// Cached access to one entity kind.
///
/// Reads are served from the collection cache when populated. Every
/// successful write drops the cache so the next read refetches; failed
/// writes leave it alone.
pub struct Repository<E: Entity> {
  store: Arc<dyn RecordStore>,
  cache: CollectionCache<E>,
}

impl<E: Entity> Repository<E> {
  pub fn new(store: Arc<dyn RecordStore>, ttl: Option<Duration>) -> Self {
    Self {
      store,
      cache: CollectionCache::new(ttl),
    }
  }

  async fn fetch(&self) -> Result<Listing<E>, StoreError> {
    let kind = E::KIND;
    let listing = self
      .cache
      .fetch_list(|| async {
        let rows = self.store.select_all(kind.table(), kind.order()).await?;
        rows.into_iter().map(E::decode).collect::<Result<Vec<_>, _>>()
      })
      .await?;

    tracing::debug!(
      kind = %kind,
      count = listing.len(),
      source = ?listing.source,
      "loaded collection"
    );
    Ok(listing)
  }

  /// Full collection, most recent first. Store failures are returned.
  pub async fn try_get_all(&self) -> Result<Vec<E>, StoreError> {
    Ok(self.fetch().await?.into_items())
  }

  /// Full collection, most recent first.
  ///
  /// Never fails: a store error is logged and comes back as an empty
  /// [`Listing`] carrying the error.
  pub async fn get_all(&self) -> Listing<E> {
    match self.fetch().await {
      Ok(listing) => listing,
      Err(e) => {
        tracing::error!(kind = %E::KIND, error = %e, "failed to load collection");
        Listing::unavailable(e)
      }
    }
  }

  /// One record by id, looked up in the full collection.
  pub async fn get(&self, id: &str) -> Result<Option<E>, StoreError> {
    let items = self.try_get_all().await?;
    Ok(items.into_iter().find(|item| item.id() == id))
  }

  pub async fn create(&self, new: &E::New) -> Result<E, StoreError> {
    let table = E::KIND.table();
    let row = self.store.insert(table, E::insert_payload(new)).await?;
    self.cache.invalidate();

    let record = E::decode(row)?;
    tracing::info!(kind = %E::KIND, id = record.id(), "created");
    Ok(record)
  }

  /// Write only the changed fields and return the full updated record.
  pub async fn update(&self, id: &str, changes: &E::Update) -> Result<E, StoreError> {
    let table = E::KIND.table();
    let payload = E::update_payload(changes, Utc::now());
    let row = self.store.update(table, id, payload).await?;
    self.cache.invalidate();

    let record = E::decode(row)?;
    tracing::info!(kind = %E::KIND, id, "updated");
    Ok(record)
  }

  pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
    self.store.delete(E::KIND.table(), id).await?;
    self.cache.invalidate();
    tracing::info!(kind = %E::KIND, id, "deleted");
    Ok(())
  }

  pub fn invalidate(&self) {
    self.cache.invalidate();
  }

  pub fn is_cached(&self) -> bool {
    self.cache.is_populated()
  }
}
