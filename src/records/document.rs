use serde::{Deserialize, Serialize};

use super::{non_empty, DocumentType, Entity, EntityKind, Payload};

/// An identity or certification document. `file_url` holds the encoded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
  pub id: String,
  pub name: String,
  #[serde(rename = "type")]
  pub document_type: DocumentType,
  pub file_url: String,
  pub file_name: String,
  pub uploaded_at: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentRow {
  id: String,
  name: String,
  #[serde(rename = "type")]
  document_type: DocumentType,
  file_url: String,
  file_name: String,
  uploaded_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
  pub name: String,
  #[serde(rename = "type")]
  pub document_type: DocumentType,
  pub file_url: String,
  pub file_name: String,
  pub uploaded_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
  pub name: Option<String>,
  #[serde(rename = "type")]
  pub document_type: Option<DocumentType>,
  pub file_url: Option<String>,
  pub file_name: Option<String>,
}

impl Entity for Document {
  const KIND: EntityKind = EntityKind::Document;
  type Row = DocumentRow;
  type New = NewDocument;
  type Update = DocumentUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: DocumentRow) -> Self {
    Document {
      id: row.id,
      name: row.name,
      document_type: row.document_type,
      file_url: row.file_url,
      file_name: row.file_name,
      uploaded_at: row.uploaded_at,
    }
  }

  fn insert_payload(new: &NewDocument) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("name", new.name.as_str())
      .set("type", new.document_type)
      .set("file_url", new.file_url.as_str())
      .set("file_name", new.file_name.as_str())
      .set("uploaded_at", new.uploaded_at.as_str());
    payload
  }

  fn changed_fields(changes: &DocumentUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(name) = non_empty(&changes.name) {
      payload.set("name", name);
    }
    if let Some(document_type) = changes.document_type {
      payload.set("type", document_type);
    }
    if let Some(file_url) = non_empty(&changes.file_url) {
      payload.set("file_url", file_url);
    }
    if let Some(file_name) = non_empty(&changes.file_name) {
      payload.set("file_name", file_name);
    }
    payload
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::StoreError;
  use serde_json::json;

  #[test]
  fn test_type_column_maps_to_document_type() {
    let document = Document::decode(json!({
      "id": "d1",
      "name": "STEM OPT card",
      "type": "stem-ead",
      "file_url": "data:application/pdf;base64,AAAA",
      "file_name": "ead.pdf",
      "uploaded_at": "2024-03-01T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(document.document_type, DocumentType::StemEad);

    let err = Document::decode(json!({
      "id": "d2",
      "name": "Passport",
      "type": "passport",
      "file_url": "",
      "file_name": "",
      "uploaded_at": "2024-03-01T00:00:00Z"
    }))
    .unwrap_err();
    assert!(matches!(err, StoreError::MalformedRow { table: "documents", .. }));
  }

  #[test]
  fn test_update_sends_only_changed_columns() {
    let changes = DocumentUpdate {
      name: Some(String::new()),
      document_type: Some(DocumentType::AwsCertificate),
      ..Default::default()
    };
    let payload = Document::changed_fields(&changes);

    assert_eq!(payload.get("type"), Some(&json!("aws-certificate")));
    assert!(!payload.contains("name"));
    assert_eq!(payload.columns().count(), 1);
  }
}
