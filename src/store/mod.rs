//! Persistence boundary.
//!
//! A store speaks in tables and JSON rows. It knows nothing about entity
//! kinds; reshaping rows into records happens in [`crate::records`].

mod rest;
mod sqlite;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::records::Payload;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

/// Row-level access to a relational store.
///
/// Every call is a single request. Nothing is retried or batched and errors
/// come back exactly as the store reported them.
#[async_trait]
pub trait RecordStore: Send + Sync {
  /// All rows of `table`, ordered by `order` columns descending.
  async fn select_all(&self, table: &str, order: &[&str]) -> Result<Vec<Value>, StoreError>;

  /// Insert one row and return it as stored, defaults and id included.
  async fn insert(&self, table: &str, payload: Payload) -> Result<Value, StoreError>;

  /// Apply `payload` to the row with `id` and return the full updated row.
  async fn update(&self, table: &str, id: &str, payload: Payload) -> Result<Value, StoreError>;

  /// Delete the row with `id`. A missing row is not an error.
  async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;
}
