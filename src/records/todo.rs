use serde::{Deserialize, Serialize};

use super::{non_empty, Entity, EntityKind, Payload, Priority};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
  pub id: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub completed: bool,
  pub priority: Priority,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub due_date: Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoRow {
  id: String,
  title: String,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  completed: Option<bool>,
  #[serde(default)]
  priority: Option<Priority>,
  #[serde(default)]
  due_date: Option<String>,
  created_at: String,
  updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
  pub title: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub completed: bool,
  #[serde(default)]
  pub priority: Priority,
  #[serde(default)]
  pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
  pub title: Option<String>,
  pub description: Option<String>,
  pub completed: Option<bool>,
  pub priority: Option<Priority>,
  pub due_date: Option<String>,
}

impl Entity for Todo {
  const KIND: EntityKind = EntityKind::Todo;
  type Row = TodoRow;
  type New = NewTodo;
  type Update = TodoUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: TodoRow) -> Self {
    Todo {
      id: row.id,
      title: row.title,
      description: row.description,
      completed: row.completed.unwrap_or(false),
      priority: row.priority.unwrap_or_default(),
      due_date: row.due_date,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }

  fn insert_payload(new: &NewTodo) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("title", new.title.as_str())
      .set_blank_as_null("description", new.description.as_deref())
      .set("completed", new.completed)
      .set("priority", new.priority)
      .set_date("due_date", new.due_date.as_deref());
    payload
  }

  fn changed_fields(changes: &TodoUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(title) = non_empty(&changes.title) {
      payload.set("title", title);
    }
    if let Some(description) = &changes.description {
      payload.set_blank_as_null("description", Some(description.as_str()));
    }
    if let Some(completed) = changes.completed {
      payload.set("completed", completed);
    }
    if let Some(priority) = changes.priority {
      payload.set("priority", priority);
    }
    if let Some(due_date) = &changes.due_date {
      payload.set_date("due_date", Some(due_date.as_str()));
    }
    payload
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::{json, Value};

  #[test]
  fn test_new_todo_defaults() {
    let new: NewTodo = serde_json::from_value(json!({"title": "Buy milk", "dueDate": ""})).unwrap();
    let payload = Todo::insert_payload(&new);

    assert_eq!(payload.get("title"), Some(&json!("Buy milk")));
    assert_eq!(payload.get("completed"), Some(&json!(false)));
    assert_eq!(payload.get("priority"), Some(&json!("medium")));
    assert_eq!(payload.get("due_date"), Some(&Value::Null));
    assert_eq!(payload.get("description"), Some(&Value::Null));
    assert!(!payload.contains("created_at"));
  }

  #[test]
  fn test_row_defaults() {
    let todo = Todo::decode(json!({
      "id": "t1",
      "title": "Buy milk",
      "completed": null,
      "priority": null,
      "created_at": "2024-05-01T00:00:00Z",
      "updated_at": "2024-05-01T00:00:00Z"
    }))
    .unwrap();
    assert!(!todo.completed);
    assert_eq!(todo.priority, Priority::Medium);
  }
}
