use serde::{Deserialize, Serialize};

use super::{non_empty, Entity, EntityKind, Payload};

/// A person in the network; references are flagged with `is_reference`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub linkedin_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  pub is_reference: bool,
}

#[derive(Debug, Deserialize)]
pub struct ContactRow {
  id: String,
  name: String,
  #[serde(default)]
  email: Option<String>,
  #[serde(default)]
  phone: Option<String>,
  #[serde(default)]
  linkedin_url: Option<String>,
  #[serde(default)]
  role: Option<String>,
  #[serde(default)]
  company: Option<String>,
  #[serde(default)]
  notes: Option<String>,
  #[serde(default)]
  is_reference: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
  pub name: String,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub phone: Option<String>,
  #[serde(default)]
  pub linkedin_url: Option<String>,
  #[serde(default)]
  pub role: Option<String>,
  #[serde(default)]
  pub company: Option<String>,
  #[serde(default)]
  pub notes: Option<String>,
  #[serde(default)]
  pub is_reference: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
  pub name: Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub linkedin_url: Option<String>,
  pub role: Option<String>,
  pub company: Option<String>,
  pub notes: Option<String>,
  pub is_reference: Option<bool>,
}

impl Entity for Contact {
  const KIND: EntityKind = EntityKind::Contact;
  type Row = ContactRow;
  type New = NewContact;
  type Update = ContactUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: ContactRow) -> Self {
    Contact {
      id: row.id,
      name: row.name,
      email: row.email,
      phone: row.phone,
      linkedin_url: row.linkedin_url,
      role: row.role,
      company: row.company,
      notes: row.notes,
      is_reference: row.is_reference.unwrap_or(false),
    }
  }

  fn insert_payload(new: &NewContact) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("name", new.name.as_str())
      .set_optional("email", new.email.as_deref())
      .set_optional("phone", new.phone.as_deref())
      .set_optional("linkedin_url", new.linkedin_url.as_deref())
      .set_optional("role", new.role.as_deref())
      .set_optional("company", new.company.as_deref())
      .set_optional("notes", new.notes.as_deref())
      .set("is_reference", new.is_reference);
    payload
  }

  fn changed_fields(changes: &ContactUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(name) = non_empty(&changes.name) {
      payload.set("name", name);
    }
    let optional_text = [
      ("email", &changes.email),
      ("phone", &changes.phone),
      ("linkedin_url", &changes.linkedin_url),
      ("role", &changes.role),
      ("company", &changes.company),
      ("notes", &changes.notes),
    ];
    for (column, value) in optional_text {
      if let Some(value) = value {
        payload.set(column, value.as_str());
      }
    }
    if let Some(is_reference) = changes.is_reference {
      payload.set("is_reference", is_reference);
    }
    payload
  }
}
