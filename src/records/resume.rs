use serde::{Deserialize, Serialize};

use super::{non_empty, Entity, EntityKind, Payload, ResumeType};

/// A resume file kept for a particular stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
  pub id: String,
  pub name: String,
  #[serde(rename = "type")]
  pub resume_type: ResumeType,
  pub file_url: String,
  pub file_name: String,
  pub uploaded_at: String,
  pub last_modified: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumeRow {
  id: String,
  name: String,
  #[serde(rename = "type")]
  resume_type: ResumeType,
  file_url: String,
  file_name: String,
  uploaded_at: String,
  #[serde(default)]
  last_modified: Option<String>,
  #[serde(default)]
  updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResume {
  pub name: String,
  #[serde(rename = "type")]
  pub resume_type: ResumeType,
  pub file_url: String,
  pub file_name: String,
  pub uploaded_at: String,
  pub last_modified: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpdate {
  pub name: Option<String>,
  #[serde(rename = "type")]
  pub resume_type: Option<ResumeType>,
  pub file_url: Option<String>,
  pub file_name: Option<String>,
  pub last_modified: Option<String>,
}

impl Entity for Resume {
  const KIND: EntityKind = EntityKind::Resume;
  type Row = ResumeRow;
  type New = NewResume;
  type Update = ResumeUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: ResumeRow) -> Self {
    Resume {
      id: row.id,
      name: row.name,
      resume_type: row.resume_type,
      file_url: row.file_url,
      file_name: row.file_name,
      uploaded_at: row.uploaded_at,
      // Rows written before last_modified existed only carry updated_at
      last_modified: row.last_modified.or(row.updated_at).unwrap_or_default(),
    }
  }

  fn insert_payload(new: &NewResume) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("name", new.name.as_str())
      .set("type", new.resume_type)
      .set("file_url", new.file_url.as_str())
      .set("file_name", new.file_name.as_str())
      .set("uploaded_at", new.uploaded_at.as_str())
      .set("last_modified", new.last_modified.as_str());
    payload
  }

  fn changed_fields(changes: &ResumeUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(name) = non_empty(&changes.name) {
      payload.set("name", name);
    }
    if let Some(resume_type) = changes.resume_type {
      payload.set("type", resume_type);
    }
    if let Some(file_url) = non_empty(&changes.file_url) {
      payload.set("file_url", file_url);
    }
    if let Some(file_name) = non_empty(&changes.file_name) {
      payload.set("file_name", file_name);
    }
    if let Some(last_modified) = non_empty(&changes.last_modified) {
      payload.set("last_modified", last_modified);
    }
    payload
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_last_modified_falls_back_to_updated_at() {
    let resume = Resume::decode(json!({
      "id": "r1",
      "name": "Backend",
      "type": "java-react-aws",
      "file_url": "data:application/pdf;base64,AAAA",
      "file_name": "backend.pdf",
      "uploaded_at": "2024-01-02T00:00:00Z",
      "last_modified": null,
      "updated_at": "2024-02-02T00:00:00Z",
      "created_at": "2024-01-02T00:00:00Z"
    }))
    .unwrap();

    assert_eq!(resume.resume_type, ResumeType::JavaReactAws);
    assert_eq!(resume.last_modified, "2024-02-02T00:00:00Z");
  }

  #[test]
  fn test_empty_name_is_not_an_update() {
    let changes = ResumeUpdate {
      name: Some(String::new()),
      file_name: Some("v2.pdf".to_string()),
      ..Default::default()
    };
    let payload = Resume::changed_fields(&changes);

    assert!(!payload.contains("name"));
    assert_eq!(payload.get("file_name"), Some(&json!("v2.pdf")));
    assert_eq!(payload.columns().count(), 1);
  }
}
