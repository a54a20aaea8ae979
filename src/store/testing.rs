//! Instrumented store for facade tests.

use async_trait::async_trait;
use serde_json::Value;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{RecordStore, SqliteStore};
use crate::error::StoreError;
use crate::records::Payload;

/// Wraps an in-memory [`SqliteStore`], counting reads and keeping every
/// write payload. `set_offline(true)` makes every call fail with a
/// connection error.
pub(crate) struct RecordingStore {
  inner: SqliteStore,
  offline: AtomicBool,
  selects: AtomicUsize,
  writes: Mutex<Vec<(String, Payload)>>,
}

impl RecordingStore {
  pub(crate) fn new() -> Self {
    Self {
      inner: SqliteStore::in_memory().unwrap(),
      offline: AtomicBool::new(false),
      selects: AtomicUsize::new(0),
      writes: Mutex::new(Vec::new()),
    }
  }

  pub(crate) fn set_offline(&self, offline: bool) {
    self.offline.store(offline, Ordering::SeqCst);
  }

  pub(crate) fn selects(&self) -> usize {
    self.selects.load(Ordering::SeqCst)
  }

  pub(crate) fn last_write(&self) -> Option<(String, Payload)> {
    self.writes.lock().unwrap().last().cloned()
  }

  fn check(&self, table: &str) -> Result<(), StoreError> {
    if self.offline.load(Ordering::SeqCst) {
      return Err(StoreError::Connection {
        table: table.to_string(),
        source: io::Error::new(io::ErrorKind::ConnectionRefused, "network unreachable").into(),
      });
    }
    Ok(())
  }
}

#[async_trait]
impl RecordStore for RecordingStore {
  async fn select_all(&self, table: &str, order: &[&str]) -> Result<Vec<Value>, StoreError> {
    self.selects.fetch_add(1, Ordering::SeqCst);
    self.check(table)?;
    self.inner.select_all(table, order).await
  }

  async fn insert(&self, table: &str, payload: Payload) -> Result<Value, StoreError> {
    self.check(table)?;
    self
      .writes
      .lock()
      .unwrap()
      .push((table.to_string(), payload.clone()));
    self.inner.insert(table, payload).await
  }

  async fn update(&self, table: &str, id: &str, payload: Payload) -> Result<Value, StoreError> {
    self.check(table)?;
    self
      .writes
      .lock()
      .unwrap()
      .push((table.to_string(), payload.clone()));
    self.inner.update(table, id, payload).await
  }

  async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
    self.check(table)?;
    self.inner.delete(table, id).await
  }
}
