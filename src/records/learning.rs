use serde::{Deserialize, Serialize};

use super::{non_empty, Entity, EntityKind, LearningCategory, LearningStatus, Payload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningItem {
  pub id: String,
  pub title: String,
  pub category: LearningCategory,
  pub status: LearningStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub started_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub completed_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LearningItemRow {
  id: String,
  title: String,
  category: LearningCategory,
  status: LearningStatus,
  #[serde(default)]
  notes: Option<String>,
  #[serde(default)]
  started_date: Option<String>,
  #[serde(default)]
  completed_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLearningItem {
  pub title: String,
  pub category: LearningCategory,
  #[serde(default)]
  pub status: LearningStatus,
  #[serde(default)]
  pub notes: Option<String>,
  #[serde(default)]
  pub started_date: Option<String>,
  #[serde(default)]
  pub completed_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningItemUpdate {
  pub title: Option<String>,
  pub category: Option<LearningCategory>,
  pub status: Option<LearningStatus>,
  pub notes: Option<String>,
  pub started_date: Option<String>,
  pub completed_date: Option<String>,
}

impl Entity for LearningItem {
  const KIND: EntityKind = EntityKind::LearningItem;
  type Row = LearningItemRow;
  type New = NewLearningItem;
  type Update = LearningItemUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: LearningItemRow) -> Self {
    LearningItem {
      id: row.id,
      title: row.title,
      category: row.category,
      status: row.status,
      notes: row.notes,
      started_date: row.started_date,
      completed_date: row.completed_date,
    }
  }

  fn insert_payload(new: &NewLearningItem) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("title", new.title.as_str())
      .set("category", new.category)
      .set("status", new.status)
      .set_optional("notes", new.notes.as_deref())
      .set_date("started_date", new.started_date.as_deref())
      .set_date("completed_date", new.completed_date.as_deref());
    payload
  }

  fn changed_fields(changes: &LearningItemUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(title) = non_empty(&changes.title) {
      payload.set("title", title);
    }
    if let Some(category) = changes.category {
      payload.set("category", category);
    }
    if let Some(status) = changes.status {
      payload.set("status", status);
    }
    if let Some(notes) = &changes.notes {
      payload.set("notes", notes.as_str());
    }
    if let Some(started_date) = &changes.started_date {
      payload.set_date("started_date", Some(started_date.as_str()));
    }
    if let Some(completed_date) = &changes.completed_date {
      payload.set_date("completed_date", Some(completed_date.as_str()));
    }
    payload
  }
}
