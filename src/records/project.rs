use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{non_empty, Entity, EntityKind, Payload};

/// A file attached to a project. `url` is an opaque payload, often a data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
  pub name: String,
  pub url: String,
  #[serde(default)]
  pub size: u64,
  #[serde(rename = "type", default)]
  pub mime_type: String,
}

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub problem_statement: Option<String>,
  pub github_link: String,
  pub files: Vec<ProjectFile>,
  pub metadata: Map<String, Value>,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectRow {
  id: String,
  name: String,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  problem_statement: Option<String>,
  #[serde(default)]
  github_link: Option<String>,
  #[serde(default)]
  files: Option<Vec<ProjectFile>>,
  #[serde(default)]
  metadata: Option<Map<String, Value>>,
  created_at: String,
  updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub problem_statement: Option<String>,
  #[serde(default)]
  pub github_link: String,
  #[serde(default)]
  pub files: Vec<ProjectFile>,
  #[serde(default)]
  pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
  pub name: Option<String>,
  pub description: Option<String>,
  pub problem_statement: Option<String>,
  pub github_link: Option<String>,
  /// Replaces the whole file list.
  pub files: Option<Vec<ProjectFile>>,
  pub metadata: Option<Map<String, Value>>,
}

impl Entity for Project {
  const KIND: EntityKind = EntityKind::Project;
  type Row = ProjectRow;
  type New = NewProject;
  type Update = ProjectUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: ProjectRow) -> Self {
    Project {
      id: row.id,
      name: row.name,
      description: row.description,
      problem_statement: row.problem_statement,
      github_link: row.github_link.unwrap_or_default(),
      files: row.files.unwrap_or_default(),
      metadata: row.metadata.unwrap_or_default(),
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }

  fn insert_payload(new: &NewProject) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("name", new.name.as_str())
      .set_optional("description", new.description.as_deref())
      .set_optional("problem_statement", new.problem_statement.as_deref())
      .set("github_link", new.github_link.as_str())
      .set("files", json!(new.files))
      .set("metadata", Value::Object(new.metadata.clone()));
    payload
  }

  fn changed_fields(changes: &ProjectUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(name) = non_empty(&changes.name) {
      payload.set("name", name);
    }
    if let Some(description) = &changes.description {
      payload.set("description", description.as_str());
    }
    if let Some(problem_statement) = &changes.problem_statement {
      payload.set("problem_statement", problem_statement.as_str());
    }
    if let Some(github_link) = non_empty(&changes.github_link) {
      payload.set("github_link", github_link);
    }
    if let Some(files) = &changes.files {
      payload.set("files", json!(files));
    }
    if let Some(metadata) = &changes.metadata {
      payload.set("metadata", Value::Object(metadata.clone()));
    }
    payload
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_null_files_and_metadata_default_empty() {
    let project = Project::decode(json!({
      "id": "p1",
      "name": "Job tracker",
      "github_link": "https://github.com/someone/tracker",
      "files": null,
      "metadata": null,
      "created_at": "2024-05-01T00:00:00Z",
      "updated_at": "2024-05-01T00:00:00Z"
    }))
    .unwrap();
    assert!(project.files.is_empty());
    assert!(project.metadata.is_empty());
  }

  #[test]
  fn test_files_keep_type_key() {
    let changes = ProjectUpdate {
      files: Some(vec![ProjectFile {
        name: "diagram.png".to_string(),
        url: "data:image/png;base64,AAAA".to_string(),
        size: 4,
        mime_type: "image/png".to_string(),
      }]),
      ..Default::default()
    };
    let payload = Project::changed_fields(&changes);

    assert_eq!(
      payload.get("files"),
      Some(&json!([{
        "name": "diagram.png",
        "url": "data:image/png;base64,AAAA",
        "size": 4,
        "type": "image/png"
      }]))
    );
    assert_eq!(payload.columns().count(), 1);
  }
}
