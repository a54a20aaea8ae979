//! PostgREST client (the Supabase REST interface).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::RecordStore;
use crate::error::StoreError;
use crate::records::Payload;

/// Ask PostgREST for a single object instead of a one-element array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Error body PostgREST sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiError {
  #[serde(default)]
  code: Option<String>,
  #[serde(default)]
  message: Option<String>,
  #[serde(default)]
  details: Option<String>,
}

#[derive(Clone)]
pub struct RestStore {
  client: Client,
  base: Url,
  key: String,
}

impl RestStore {
  /// `url` is the project root, e.g. `https://abc.supabase.co`.
  pub fn new(url: &str, key: &str) -> Result<Self, StoreError> {
    let mut root = Url::parse(url)?;
    if !root.path().ends_with('/') {
      let path = format!("{}/", root.path());
      root.set_path(&path);
    }
    let base = root.join("rest/v1/")?;

    let client = Client::builder()
      .user_agent(concat!("jobhunt/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|source| StoreError::Http {
        table: "*".to_string(),
        source,
      })?;

    Ok(Self {
      client,
      base,
      key: key.to_string(),
    })
  }

  fn table_url(&self, table: &str) -> Result<Url, StoreError> {
    Ok(self.base.join(table)?)
  }

  fn row_url(&self, table: &str, id: &str) -> Result<Url, StoreError> {
    let mut url = self.table_url(table)?;
    url
      .query_pairs_mut()
      .append_pair("id", &format!("eq.{id}"));
    Ok(url)
  }

  fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
    request.header("apikey", &self.key).bearer_auth(&self.key)
  }

  async fn send(table: &str, request: RequestBuilder) -> Result<Response, StoreError> {
    request.send().await.map_err(|e| transport_error(table, e))
  }

  /// Read the body, turning non-2xx answers into [`StoreError::Rejected`].
  async fn read_json(table: &str, response: Response) -> Result<Value, StoreError> {
    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| transport_error(table, e))?;

    if !status.is_success() {
      tracing::debug!(table, status = status.as_u16(), body = %body, "store rejected request");
      return Err(rejected(table, status, &body));
    }

    serde_json::from_str(&body).map_err(|e| StoreError::Rejected {
      table: table.to_string(),
      status: status.as_u16(),
      code: None,
      message: format!("response is not JSON: {e}"),
    })
  }
}

fn transport_error(table: &str, source: reqwest::Error) -> StoreError {
  if source.is_connect() {
    StoreError::Connection {
      table: table.to_string(),
      source: Box::new(source),
    }
  } else {
    StoreError::Http {
      table: table.to_string(),
      source,
    }
  }
}

/// Error code and message from a PostgREST error body, falling back to the
/// raw body or the status line.
fn api_error(status: StatusCode, body: &str) -> (Option<String>, String) {
  match serde_json::from_str::<ApiError>(body).ok() {
    Some(err) => {
      let message = match (err.message, err.details) {
        (Some(m), Some(d)) => format!("{m} ({d})"),
        (Some(m), None) => m,
        (None, Some(d)) => d,
        (None, None) => body.to_string(),
      };
      (err.code, message)
    }
    None if body.is_empty() => (None, status.to_string()),
    None => (None, body.to_string()),
  }
}

fn rejected(table: &str, status: StatusCode, body: &str) -> StoreError {
  let (code, message) = api_error(status, body);
  StoreError::Rejected {
    table: table.to_string(),
    status: status.as_u16(),
    code,
    message,
  }
}

#[async_trait]
impl RecordStore for RestStore {
  async fn select_all(&self, table: &str, order: &[&str]) -> Result<Vec<Value>, StoreError> {
    let mut url = self.table_url(table)?;
    {
      let mut query = url.query_pairs_mut();
      query.append_pair("select", "*");
      if !order.is_empty() {
        let order = order
          .iter()
          .map(|column| format!("{column}.desc"))
          .collect::<Vec<_>>()
          .join(",");
        query.append_pair("order", &order);
      }
    }

    tracing::debug!(table, "GET {}", url);
    let response = Self::send(table, self.authorized(self.client.get(url))).await?;
    let body = Self::read_json(table, response).await?;

    match body {
      Value::Array(rows) => Ok(rows),
      other => Err(StoreError::Rejected {
        table: table.to_string(),
        status: 200,
        code: None,
        message: format!("expected an array of rows, got {other}"),
      }),
    }
  }

  async fn insert(&self, table: &str, payload: Payload) -> Result<Value, StoreError> {
    let url = self.table_url(table)?;
    let request = self
      .client
      .post(url)
      .header("Prefer", "return=representation")
      .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
      .json(&payload);

    let response = Self::send(table, self.authorized(request)).await?;
    Self::read_json(table, response).await
  }

  async fn update(&self, table: &str, id: &str, payload: Payload) -> Result<Value, StoreError> {
    let url = self.row_url(table, id)?;
    let request = self
      .client
      .patch(url)
      .header("Prefer", "return=representation")
      .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
      .json(&payload);

    let response = Self::send(table, self.authorized(request)).await?;
    // A single-object request that matched zero rows.
    if response.status() == StatusCode::NOT_ACCEPTABLE {
      let body = response
        .text()
        .await
        .map_err(|e| transport_error(table, e))?;
      let (code, message) = api_error(StatusCode::NOT_ACCEPTABLE, &body);
      return Err(StoreError::NotFound {
        table: table.to_string(),
        id: id.to_string(),
        code,
        message: Some(message),
      });
    }
    Self::read_json(table, response).await
  }

  async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
    let url = self.row_url(table, id)?;
    let response = Self::send(table, self.authorized(self.client.delete(url))).await?;

    let status = response.status();
    if status.is_success() {
      return Ok(());
    }
    let body = response
      .text()
      .await
      .map_err(|e| transport_error(table, e))?;
    Err(rejected(table, status, &body))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use wiremock::matchers::{body_json, header, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn payload(value: Value) -> Payload {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn test_base_url_with_and_without_slash() {
    let a = RestStore::new("https://abc.supabase.co", "k").unwrap();
    let b = RestStore::new("https://abc.supabase.co/", "k").unwrap();
    assert_eq!(a.base.as_str(), "https://abc.supabase.co/rest/v1/");
    assert_eq!(a.base, b.base);
    assert_eq!(
      a.row_url("todos", "t1").unwrap().as_str(),
      "https://abc.supabase.co/rest/v1/todos?id=eq.t1"
    );
  }

  #[test]
  fn test_invalid_url() {
    assert!(matches!(
      RestStore::new("not a url", "k"),
      Err(StoreError::InvalidUrl(_))
    ));
  }

  #[tokio::test]
  async fn test_select_sends_order_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/rest/v1/recruiter_calls"))
      .and(query_param("select", "*"))
      .and(query_param("order", "call_date.desc,call_time.desc"))
      .and(header("apikey", "secret"))
      .and(header("authorization", "Bearer secret"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "c1"}, {"id": "c2"}])))
      .expect(1)
      .mount(&server)
      .await;

    let store = RestStore::new(&server.uri(), "secret").unwrap();
    let rows = store
      .select_all("recruiter_calls", &["call_date", "call_time"])
      .await
      .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], json!("c1"));
  }

  #[tokio::test]
  async fn test_insert_returns_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/rest/v1/todos"))
      .and(header("prefer", "return=representation"))
      .and(header("accept", SINGLE_OBJECT))
      .and(body_json(json!({"title": "Buy milk"})))
      .respond_with(
        ResponseTemplate::new(201).set_body_json(json!({"id": "t1", "title": "Buy milk"})),
      )
      .mount(&server)
      .await;

    let store = RestStore::new(&server.uri(), "k").unwrap();
    let row = store
      .insert("todos", payload(json!({"title": "Buy milk"})))
      .await
      .unwrap();
    assert_eq!(row["id"], json!("t1"));
  }

  #[tokio::test]
  async fn test_constraint_violation_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/rest/v1/contacts"))
      .respond_with(ResponseTemplate::new(409).set_body_json(json!({
        "code": "23505",
        "message": "duplicate key value violates unique constraint",
        "details": null,
        "hint": null
      })))
      .mount(&server)
      .await;

    let store = RestStore::new(&server.uri(), "k").unwrap();
    let err = store
      .insert("contacts", payload(json!({"name": "Sam"})))
      .await
      .unwrap_err();
    match err {
      StoreError::Rejected {
        status,
        code,
        message,
        ..
      } => {
        assert_eq!(status, 409);
        assert_eq!(code.as_deref(), Some("23505"));
        assert!(message.starts_with("duplicate key"));
      }
      other => panic!("expected Rejected, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_update_targets_row_and_maps_406() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
      .and(path("/rest/v1/notes"))
      .and(query_param("id", "eq.n1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "n1", "title": "x"})))
      .mount(&server)
      .await;
    Mock::given(method("PATCH"))
      .and(path("/rest/v1/notes"))
      .and(query_param("id", "eq.missing"))
      .respond_with(ResponseTemplate::new(406).set_body_json(json!({
        "code": "PGRST116",
        "message": "JSON object requested, multiple (or no) rows returned"
      })))
      .mount(&server)
      .await;

    let store = RestStore::new(&server.uri(), "k").unwrap();
    let row = store
      .update("notes", "n1", payload(json!({"title": "x"})))
      .await
      .unwrap();
    assert_eq!(row["title"], json!("x"));

    let err = store
      .update("notes", "missing", payload(json!({"title": "x"})))
      .await
      .unwrap_err();
    match err {
      StoreError::NotFound { id, code, message, .. } => {
        assert_eq!(id, "missing");
        assert_eq!(code.as_deref(), Some("PGRST116"));
        assert!(message.unwrap().starts_with("JSON object requested"));
      }
      other => panic!("expected NotFound, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_delete_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
      .and(path("/rest/v1/links"))
      .and(query_param("id", "eq.l1"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&server)
      .await;

    let store = RestStore::new(&server.uri(), "k").unwrap();
    store.delete("links", "l1").await.unwrap();
  }

  #[tokio::test]
  async fn test_unreachable_store_is_connection_error() {
    // Bind then drop a listener so the port is known to be closed.
    let port = {
      let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
      listener.local_addr().unwrap().port()
    };
    let store = RestStore::new(&format!("http://127.0.0.1:{port}"), "k").unwrap();

    let err = store.select_all("todos", &["created_at"]).await.unwrap_err();
    assert!(err.is_connection(), "got {err:?}");
    let source = std::error::Error::source(&err).expect("connection error keeps its cause");
    assert!(source.downcast_ref::<reqwest::Error>().is_some());
  }
}
