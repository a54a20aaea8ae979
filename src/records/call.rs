use serde::{Deserialize, Serialize};

use super::{non_empty, CallStatus, Entity, EntityKind, Payload};

/// A phone screen or call with a recruiter.
///
/// `status` and `follow_up_happened` are independent columns. Callers that
/// toggle the follow-up flag are expected to write the matching status
/// themselves (see [`CallStatus::for_follow_up`]); nothing here derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterCall {
  pub id: String,
  pub company_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub recruiter_name: Option<String>,
  pub call_date: String,
  pub call_time: String,
  pub follow_up_happened: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub follow_up_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub follow_up_notes: Option<String>,
  pub discussion_notes: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub recruiter_phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub recruiter_email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position: Option<String>,
  pub status: CallStatus,
}

#[derive(Debug, Deserialize)]
pub struct RecruiterCallRow {
  id: String,
  company_name: String,
  #[serde(default)]
  recruiter_name: Option<String>,
  call_date: String,
  call_time: String,
  #[serde(default)]
  follow_up_happened: Option<bool>,
  #[serde(default)]
  follow_up_date: Option<String>,
  #[serde(default)]
  follow_up_notes: Option<String>,
  #[serde(default)]
  discussion_notes: Option<String>,
  #[serde(default)]
  recruiter_phone: Option<String>,
  #[serde(default)]
  recruiter_email: Option<String>,
  #[serde(default)]
  position: Option<String>,
  status: CallStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecruiterCall {
  pub company_name: String,
  #[serde(default)]
  pub recruiter_name: Option<String>,
  pub call_date: String,
  pub call_time: String,
  #[serde(default)]
  pub follow_up_happened: bool,
  #[serde(default)]
  pub follow_up_date: Option<String>,
  #[serde(default)]
  pub follow_up_notes: Option<String>,
  #[serde(default)]
  pub discussion_notes: String,
  #[serde(default)]
  pub recruiter_phone: Option<String>,
  #[serde(default)]
  pub recruiter_email: Option<String>,
  #[serde(default)]
  pub position: Option<String>,
  #[serde(default)]
  pub status: CallStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterCallUpdate {
  pub company_name: Option<String>,
  pub recruiter_name: Option<String>,
  pub call_date: Option<String>,
  pub call_time: Option<String>,
  pub follow_up_happened: Option<bool>,
  pub follow_up_date: Option<String>,
  pub follow_up_notes: Option<String>,
  pub discussion_notes: Option<String>,
  pub recruiter_phone: Option<String>,
  pub recruiter_email: Option<String>,
  pub position: Option<String>,
  pub status: Option<CallStatus>,
}

impl RecruiterCallUpdate {
  /// Flip the follow-up flag and write the status that goes with it.
  pub fn follow_up(happened: bool) -> Self {
    RecruiterCallUpdate {
      follow_up_happened: Some(happened),
      status: Some(CallStatus::for_follow_up(happened)),
      ..Default::default()
    }
  }
}

impl Entity for RecruiterCall {
  const KIND: EntityKind = EntityKind::RecruiterCall;
  type Row = RecruiterCallRow;
  type New = NewRecruiterCall;
  type Update = RecruiterCallUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: RecruiterCallRow) -> Self {
    RecruiterCall {
      id: row.id,
      company_name: row.company_name,
      recruiter_name: row.recruiter_name,
      call_date: row.call_date,
      call_time: row.call_time,
      follow_up_happened: row.follow_up_happened.unwrap_or(false),
      follow_up_date: row.follow_up_date,
      follow_up_notes: row.follow_up_notes,
      discussion_notes: row.discussion_notes.unwrap_or_default(),
      recruiter_phone: row.recruiter_phone,
      recruiter_email: row.recruiter_email,
      position: row.position,
      status: row.status,
    }
  }

  fn insert_payload(new: &NewRecruiterCall) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("company_name", new.company_name.as_str())
      .set_blank_as_null("recruiter_name", new.recruiter_name.as_deref())
      .set("call_date", new.call_date.as_str())
      .set("call_time", new.call_time.as_str())
      .set("follow_up_happened", new.follow_up_happened)
      .set_date("follow_up_date", new.follow_up_date.as_deref())
      .set_blank_as_null("follow_up_notes", new.follow_up_notes.as_deref())
      .set("discussion_notes", new.discussion_notes.as_str())
      .set_blank_as_null("recruiter_phone", new.recruiter_phone.as_deref())
      .set_blank_as_null("recruiter_email", new.recruiter_email.as_deref())
      .set_blank_as_null("position", new.position.as_deref())
      .set("status", new.status);
    payload
  }

  fn changed_fields(changes: &RecruiterCallUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(company_name) = non_empty(&changes.company_name) {
      payload.set("company_name", company_name);
    }
    if let Some(recruiter_name) = &changes.recruiter_name {
      payload.set_blank_as_null("recruiter_name", Some(recruiter_name.as_str()));
    }
    if let Some(call_date) = non_empty(&changes.call_date) {
      payload.set("call_date", call_date);
    }
    if let Some(call_time) = non_empty(&changes.call_time) {
      payload.set("call_time", call_time);
    }
    if let Some(happened) = changes.follow_up_happened {
      payload.set("follow_up_happened", happened);
    }
    if let Some(follow_up_date) = &changes.follow_up_date {
      payload.set_date("follow_up_date", Some(follow_up_date.as_str()));
    }
    if let Some(follow_up_notes) = &changes.follow_up_notes {
      payload.set_blank_as_null("follow_up_notes", Some(follow_up_notes.as_str()));
    }
    if let Some(discussion_notes) = non_empty(&changes.discussion_notes) {
      payload.set("discussion_notes", discussion_notes);
    }
    if let Some(recruiter_phone) = &changes.recruiter_phone {
      payload.set_blank_as_null("recruiter_phone", Some(recruiter_phone.as_str()));
    }
    if let Some(recruiter_email) = &changes.recruiter_email {
      payload.set_blank_as_null("recruiter_email", Some(recruiter_email.as_str()));
    }
    if let Some(position) = &changes.position {
      payload.set_blank_as_null("position", Some(position.as_str()));
    }
    if let Some(status) = changes.status {
      payload.set("status", status);
    }
    payload
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::{json, Value};

  #[test]
  fn test_follow_up_flag_does_not_imply_status() {
    let changes = RecruiterCallUpdate {
      follow_up_happened: Some(true),
      ..Default::default()
    };
    let payload = RecruiterCall::changed_fields(&changes);

    assert_eq!(payload.get("follow_up_happened"), Some(&json!(true)));
    assert!(!payload.contains("status"));
  }

  #[test]
  fn test_follow_up_helper_writes_both_columns() {
    let payload = RecruiterCall::changed_fields(&RecruiterCallUpdate::follow_up(false));
    assert_eq!(payload.get("follow_up_happened"), Some(&json!(false)));
    assert_eq!(payload.get("status"), Some(&json!("pending")));
  }

  #[test]
  fn test_blank_optional_text_becomes_null() {
    let new: NewRecruiterCall = serde_json::from_value(json!({
      "companyName": "Globex",
      "recruiterName": "",
      "callDate": "2024-06-10",
      "callTime": "14:30",
      "followUpDate": "",
      "discussionNotes": "Contract role, 6 months",
      "position": "SRE"
    }))
    .unwrap();
    let payload = RecruiterCall::insert_payload(&new);

    assert_eq!(payload.get("recruiter_name"), Some(&Value::Null));
    assert_eq!(payload.get("follow_up_date"), Some(&Value::Null));
    assert_eq!(payload.get("position"), Some(&json!("SRE")));
    assert_eq!(payload.get("status"), Some(&json!("pending")));
    assert_eq!(payload.get("follow_up_happened"), Some(&json!(false)));
  }
}
