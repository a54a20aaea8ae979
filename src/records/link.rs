use serde::{Deserialize, Serialize};

use super::{non_empty, Entity, EntityKind, LinkCategory, Payload};

/// A bookmarked URL (job boards, portfolio, certifications).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
  pub id: String,
  pub title: String,
  pub url: String,
  pub category: LinkCategory,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkRow {
  id: String,
  title: String,
  url: String,
  category: LinkCategory,
  #[serde(default)]
  description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
  pub title: String,
  pub url: String,
  pub category: LinkCategory,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkUpdate {
  pub title: Option<String>,
  pub url: Option<String>,
  pub category: Option<LinkCategory>,
  pub description: Option<String>,
}

impl Entity for Link {
  const KIND: EntityKind = EntityKind::Link;
  type Row = LinkRow;
  type New = NewLink;
  type Update = LinkUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: LinkRow) -> Self {
    Link {
      id: row.id,
      title: row.title,
      url: row.url,
      category: row.category,
      description: row.description,
    }
  }

  fn insert_payload(new: &NewLink) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("title", new.title.as_str())
      .set("url", new.url.as_str())
      .set("category", new.category)
      .set_optional("description", new.description.as_deref());
    payload
  }

  fn changed_fields(changes: &LinkUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(title) = non_empty(&changes.title) {
      payload.set("title", title);
    }
    if let Some(url) = non_empty(&changes.url) {
      payload.set("url", url);
    }
    if let Some(category) = changes.category {
      payload.set("category", category);
    }
    if let Some(description) = &changes.description {
      payload.set("description", description.as_str());
    }
    payload
  }
}
