use serde::{Deserialize, Serialize};

use super::{non_empty, Entity, EntityKind, Payload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
  pub id: String,
  pub title: String,
  pub content: String,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRow {
  id: String,
  title: String,
  #[serde(default)]
  content: Option<String>,
  created_at: String,
  updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
  pub title: String,
  #[serde(default)]
  pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteUpdate {
  pub title: Option<String>,
  pub content: Option<String>,
}

impl Entity for Note {
  const KIND: EntityKind = EntityKind::Note;
  type Row = NoteRow;
  type New = NewNote;
  type Update = NoteUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: NoteRow) -> Self {
    Note {
      id: row.id,
      title: row.title,
      content: row.content.unwrap_or_default(),
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }

  // Timestamps are assigned by the store.
  fn insert_payload(new: &NewNote) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("title", new.title.as_str())
      .set("content", new.content.as_str());
    payload
  }

  fn changed_fields(changes: &NoteUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(title) = non_empty(&changes.title) {
      payload.set("title", title);
    }
    if let Some(content) = non_empty(&changes.content) {
      payload.set("content", content);
    }
    payload
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_insert_never_sets_timestamps() {
    let payload = Note::insert_payload(&NewNote {
      title: "Prep".to_string(),
      content: "Read the job posting twice".to_string(),
    });
    assert!(!payload.contains("created_at"));
    assert!(!payload.contains("updated_at"));
    assert_eq!(payload.columns().count(), 2);
  }
}
