//! Errors raised at the persistence boundary.
//!
//! The access facade hands these back to callers untouched, so a caller can
//! tell a connectivity problem from a constraint violation without parsing
//! strings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  /// The store could not be reached at all (DNS, refused connection, TLS).
  #[error("could not reach the store for {table}: {source}")]
  Connection {
    table: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// The request failed mid-flight or the response body could not be read.
  #[error("request to {table} failed: {source}")]
  Http {
    table: String,
    #[source]
    source: reqwest::Error,
  },

  /// The store answered with an error (constraint violation, auth, bad column).
  #[error("{table}: store rejected the request ({status}): {message}")]
  Rejected {
    table: String,
    status: u16,
    code: Option<String>,
    message: String,
  },

  /// No row matched. `code` and `message` are the store's own account of
  /// it, when it gave one.
  #[error("{table}: no row with id {id}")]
  NotFound {
    table: String,
    id: String,
    code: Option<String>,
    message: Option<String>,
  },

  /// A row came back that does not match the table's schema.
  #[error("{table}: malformed row: {source}")]
  MalformedRow {
    table: &'static str,
    #[source]
    source: serde_json::Error,
  },

  #[error("JSON error: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("local database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("invalid store url: {0}")]
  InvalidUrl(#[from] url::ParseError),
}

impl StoreError {
  /// True for failures where the store was never reached.
  pub fn is_connection(&self) -> bool {
    matches!(self, StoreError::Connection { .. })
  }
}
