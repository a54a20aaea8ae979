//! Local SQLite store.
//!
//! Rows live as JSON documents in one table keyed by (table, id). The store
//! fills in what the hosted database would: generated ids, timestamps and
//! per-table column defaults.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use super::RecordStore;
use crate::error::StoreError;
use crate::records::Payload;

pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open (or create) a database file. The parent directory must exist.
  pub fn open(path: &Path) -> Result<Self, StoreError> {
    let conn = Connection::open(path)?;
    Self::with_connection(conn)
  }

  pub fn in_memory() -> Result<Self, StoreError> {
    let conn = Connection::open_in_memory()?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self, StoreError> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn lock(&self) -> MutexGuard<'_, Connection> {
    self.conn.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn load(conn: &Connection, table: &str, id: &str) -> Result<Option<Map<String, Value>>, StoreError> {
    let data: Option<String> = conn
      .query_row(
        "SELECT data FROM records WHERE tbl = ? AND id = ?",
        params![table, id],
        |row| row.get(0),
      )
      .optional()?;

    match data {
      Some(data) => Ok(Some(serde_json::from_str(&data)?)),
      None => Ok(None),
    }
  }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    tbl TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL,
    PRIMARY KEY (tbl, id)
);
"#;

/// Column defaults the hosted schema declares for each table.
fn column_defaults(table: &str) -> Value {
  match table {
    "job_applications" => json!({"status": "applied", "notes": ""}),
    "contacts" => json!({"is_reference": false}),
    "recruiter_calls" => json!({"follow_up_happened": false, "status": "pending"}),
    "learning_items" => json!({"status": "not-started"}),
    "todos" => json!({"completed": false, "priority": "medium"}),
    "projects" => json!({"files": [], "metadata": {}}),
    "interview_questions" => json!({
      "category": "technical",
      "difficulty": "medium",
      "times_practiced": 0
    }),
    _ => json!({}),
  }
}

fn timestamp() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `ORDER BY` over JSON fields, descending with nulls first like PostgreSQL.
/// Insertion order breaks ties, newest first.
fn order_clause(order: &[&str]) -> String {
  let mut terms = Vec::with_capacity(order.len() * 2 + 1);
  for i in 1..=order.len() {
    let param = i + 1;
    terms.push(format!("json_extract(data, ?{param}) IS NULL DESC"));
    terms.push(format!("json_extract(data, ?{param}) DESC"));
  }
  terms.push("rowid DESC".to_string());
  terms.join(", ")
}

#[async_trait]
impl RecordStore for SqliteStore {
  async fn select_all(&self, table: &str, order: &[&str]) -> Result<Vec<Value>, StoreError> {
    let conn = self.lock();
    let sql = format!(
      "SELECT data FROM records WHERE tbl = ?1 ORDER BY {}",
      order_clause(order)
    );

    let mut bindings = vec![table.to_string()];
    bindings.extend(order.iter().map(|column| format!("$.{column}")));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
      .query_map(params_from_iter(bindings.iter()), |row| row.get::<_, String>(0))?
      .collect::<Result<Vec<_>, _>>()?;

    rows
      .iter()
      .map(|data| serde_json::from_str(data).map_err(StoreError::from))
      .collect()
  }

  async fn insert(&self, table: &str, payload: Payload) -> Result<Value, StoreError> {
    let now = timestamp();
    let mut row = match column_defaults(table) {
      Value::Object(map) => map,
      _ => Map::new(),
    };
    row.insert("created_at".to_string(), Value::String(now.clone()));
    row.insert("updated_at".to_string(), Value::String(now.clone()));
    if matches!(table, "resumes" | "documents") {
      row.insert("uploaded_at".to_string(), Value::String(now));
    }
    row.extend(payload.into_map());

    let id = Uuid::new_v4().to_string();
    row.insert("id".to_string(), Value::String(id.clone()));

    let conn = self.lock();
    conn.execute(
      "INSERT INTO records (tbl, id, data) VALUES (?, ?, ?)",
      params![table, id, serde_json::to_string(&row)?],
    )?;

    tracing::debug!(table, %id, "inserted row");
    Ok(Value::Object(row))
  }

  async fn update(&self, table: &str, id: &str, payload: Payload) -> Result<Value, StoreError> {
    let conn = self.lock();
    let mut row = Self::load(&conn, table, id)?.ok_or_else(|| StoreError::NotFound {
      table: table.to_string(),
      id: id.to_string(),
      code: None,
      message: None,
    })?;

    row.extend(payload.into_map());
    row.insert("id".to_string(), Value::String(id.to_string()));

    conn.execute(
      "UPDATE records SET data = ? WHERE tbl = ? AND id = ?",
      params![serde_json::to_string(&row)?, table, id],
    )?;

    Ok(Value::Object(row))
  }

  async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
    let conn = self.lock();
    let removed = conn.execute(
      "DELETE FROM records WHERE tbl = ? AND id = ?",
      params![table, id],
    )?;
    if removed == 0 {
      tracing::debug!(table, id, "delete matched no row");
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(value: Value) -> Payload {
    serde_json::from_value(value).unwrap()
  }

  #[tokio::test]
  async fn test_insert_fills_id_and_defaults() {
    let store = SqliteStore::in_memory().unwrap();
    let row = store
      .insert("todos", payload(json!({"title": "Buy milk"})))
      .await
      .unwrap();

    assert!(Uuid::parse_str(row["id"].as_str().unwrap()).is_ok());
    assert_eq!(row["completed"], json!(false));
    assert_eq!(row["priority"], json!("medium"));
    assert!(row["created_at"].is_string());
    assert_eq!(row["created_at"], row["updated_at"]);
  }

  #[tokio::test]
  async fn test_payload_overrides_defaults() {
    let store = SqliteStore::in_memory().unwrap();
    let row = store
      .insert("todos", payload(json!({"title": "Ship", "priority": "high"})))
      .await
      .unwrap();
    assert_eq!(row["priority"], json!("high"));
  }

  #[tokio::test]
  async fn test_select_orders_desc_with_nulls_first() {
    let store = SqliteStore::in_memory().unwrap();
    for date in [json!("2024-01-05"), json!(null), json!("2024-03-01"), json!("2024-02-10")] {
      store
        .insert("job_applications", payload(json!({"applied_date": date})))
        .await
        .unwrap();
    }

    let rows = store
      .select_all("job_applications", &["applied_date"])
      .await
      .unwrap();
    let dates: Vec<_> = rows.iter().map(|r| r["applied_date"].clone()).collect();
    assert_eq!(
      dates,
      vec![
        json!(null),
        json!("2024-03-01"),
        json!("2024-02-10"),
        json!("2024-01-05")
      ]
    );
  }

  #[tokio::test]
  async fn test_secondary_order_column() {
    let store = SqliteStore::in_memory().unwrap();
    for (date, time) in [("2024-06-01", "09:00"), ("2024-06-01", "15:30"), ("2024-05-30", "18:00")] {
      store
        .insert(
          "recruiter_calls",
          payload(json!({"call_date": date, "call_time": time})),
        )
        .await
        .unwrap();
    }

    let rows = store
      .select_all("recruiter_calls", &["call_date", "call_time"])
      .await
      .unwrap();
    let times: Vec<_> = rows.iter().map(|r| r["call_time"].as_str().unwrap()).collect();
    assert_eq!(times, vec!["15:30", "09:00", "18:00"]);
  }

  #[tokio::test]
  async fn test_tables_are_isolated() {
    let store = SqliteStore::in_memory().unwrap();
    store.insert("notes", payload(json!({"title": "a"}))).await.unwrap();

    assert!(store.select_all("todos", &["created_at"]).await.unwrap().is_empty());
    assert_eq!(store.select_all("notes", &["created_at"]).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_update_merges_and_returns_full_row() {
    let store = SqliteStore::in_memory().unwrap();
    let row = store
      .insert("notes", payload(json!({"title": "Prep", "content": "old"})))
      .await
      .unwrap();
    let id = row["id"].as_str().unwrap();

    let updated = store
      .update("notes", id, payload(json!({"content": "new"})))
      .await
      .unwrap();
    assert_eq!(updated["title"], json!("Prep"));
    assert_eq!(updated["content"], json!("new"));
    assert_eq!(updated["id"], json!(id));
  }

  #[tokio::test]
  async fn test_update_missing_row_is_not_found() {
    let store = SqliteStore::in_memory().unwrap();
    let err = store
      .update("notes", "nope", payload(json!({"title": "x"})))
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
  }

  #[tokio::test]
  async fn test_delete_missing_row_succeeds() {
    let store = SqliteStore::in_memory().unwrap();
    store.delete("notes", "nope").await.unwrap();
  }

  #[tokio::test]
  async fn test_open_file_persists() {
    let dir = std::env::temp_dir().join(format!("jobhunt-store-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("records.db");

    {
      let store = SqliteStore::open(&path).unwrap();
      store.insert("links", payload(json!({"title": "x"}))).await.unwrap();
    }
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.select_all("links", &["created_at"]).await.unwrap().len(), 1);

    std::fs::remove_dir_all(&dir).unwrap();
  }
}
