use serde::{Deserialize, Serialize};

use super::{non_empty, ApplicationStatus, Entity, EntityKind, Payload};

/// A job application sent to a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
  pub id: String,
  pub company_name: String,
  pub position: String,
  pub contact_person: String,
  pub contact_email: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_phone: Option<String>,
  pub applied_date: String,
  pub status: ApplicationStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub follow_up_date: Option<String>,
  pub notes: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub recruiter_email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub recruiter_phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub job_url: Option<String>,
  /// Free-text pointer at a resume. Not checked against the resume collection.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub resume_used: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobApplicationRow {
  id: String,
  company_name: String,
  position: String,
  contact_person: String,
  contact_email: String,
  #[serde(default)]
  contact_phone: Option<String>,
  applied_date: String,
  status: ApplicationStatus,
  #[serde(default)]
  follow_up_date: Option<String>,
  #[serde(default)]
  notes: Option<String>,
  #[serde(default)]
  recruiter_email: Option<String>,
  #[serde(default)]
  recruiter_phone: Option<String>,
  #[serde(default)]
  job_url: Option<String>,
  #[serde(default)]
  resume_used: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobApplication {
  pub company_name: String,
  pub position: String,
  pub contact_person: String,
  pub contact_email: String,
  #[serde(default)]
  pub contact_phone: Option<String>,
  pub applied_date: String,
  #[serde(default)]
  pub status: ApplicationStatus,
  #[serde(default)]
  pub follow_up_date: Option<String>,
  #[serde(default)]
  pub notes: String,
  #[serde(default)]
  pub recruiter_email: Option<String>,
  #[serde(default)]
  pub recruiter_phone: Option<String>,
  #[serde(default)]
  pub job_url: Option<String>,
  #[serde(default)]
  pub resume_used: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationUpdate {
  pub company_name: Option<String>,
  pub position: Option<String>,
  pub contact_person: Option<String>,
  pub contact_email: Option<String>,
  pub contact_phone: Option<String>,
  pub applied_date: Option<String>,
  pub status: Option<ApplicationStatus>,
  pub follow_up_date: Option<String>,
  pub notes: Option<String>,
  pub recruiter_email: Option<String>,
  pub recruiter_phone: Option<String>,
  pub job_url: Option<String>,
  pub resume_used: Option<String>,
}

impl Entity for JobApplication {
  const KIND: EntityKind = EntityKind::JobApplication;
  type Row = JobApplicationRow;
  type New = NewJobApplication;
  type Update = ApplicationUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: JobApplicationRow) -> Self {
    JobApplication {
      id: row.id,
      company_name: row.company_name,
      position: row.position,
      contact_person: row.contact_person,
      contact_email: row.contact_email,
      contact_phone: row.contact_phone,
      applied_date: row.applied_date,
      status: row.status,
      follow_up_date: row.follow_up_date,
      notes: row.notes.unwrap_or_default(),
      recruiter_email: row.recruiter_email,
      recruiter_phone: row.recruiter_phone,
      job_url: row.job_url,
      resume_used: row.resume_used,
    }
  }

  fn insert_payload(new: &NewJobApplication) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("company_name", new.company_name.as_str())
      .set("position", new.position.as_str())
      .set("contact_person", new.contact_person.as_str())
      .set("contact_email", new.contact_email.as_str())
      .set_optional("contact_phone", new.contact_phone.as_deref())
      .set("applied_date", new.applied_date.as_str())
      .set("status", new.status)
      .set_date("follow_up_date", new.follow_up_date.as_deref())
      .set("notes", new.notes.as_str())
      .set_optional("recruiter_email", new.recruiter_email.as_deref())
      .set_optional("recruiter_phone", new.recruiter_phone.as_deref())
      .set_optional("job_url", new.job_url.as_deref())
      .set_optional("resume_used", new.resume_used.as_deref());
    payload
  }

  fn changed_fields(changes: &ApplicationUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(company_name) = non_empty(&changes.company_name) {
      payload.set("company_name", company_name);
    }
    if let Some(position) = non_empty(&changes.position) {
      payload.set("position", position);
    }
    if let Some(contact_person) = non_empty(&changes.contact_person) {
      payload.set("contact_person", contact_person);
    }
    if let Some(contact_email) = non_empty(&changes.contact_email) {
      payload.set("contact_email", contact_email);
    }
    if let Some(contact_phone) = &changes.contact_phone {
      payload.set("contact_phone", contact_phone.as_str());
    }
    if let Some(applied_date) = non_empty(&changes.applied_date) {
      payload.set("applied_date", applied_date);
    }
    if let Some(status) = changes.status {
      payload.set("status", status);
    }
    if let Some(follow_up_date) = &changes.follow_up_date {
      payload.set_date("follow_up_date", Some(follow_up_date.as_str()));
    }
    if let Some(notes) = &changes.notes {
      payload.set("notes", notes.as_str());
    }
    if let Some(recruiter_email) = &changes.recruiter_email {
      payload.set("recruiter_email", recruiter_email.as_str());
    }
    if let Some(recruiter_phone) = &changes.recruiter_phone {
      payload.set("recruiter_phone", recruiter_phone.as_str());
    }
    if let Some(job_url) = &changes.job_url {
      payload.set("job_url", job_url.as_str());
    }
    if let Some(resume_used) = &changes.resume_used {
      payload.set("resume_used", resume_used.as_str());
    }
    payload
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::{json, Value};

  fn row() -> Value {
    json!({
      "id": "a1",
      "company_name": "Acme",
      "position": "Backend Engineer",
      "contact_person": "Dana",
      "contact_email": "dana@acme.test",
      "contact_phone": null,
      "applied_date": "2024-04-01",
      "status": "interview-scheduled",
      "follow_up_date": null,
      "notes": null,
      "recruiter_email": null,
      "recruiter_phone": null,
      "job_url": "https://acme.test/jobs/1",
      "resume_used": null
    })
  }

  #[test]
  fn test_null_notes_default_to_empty() {
    let app = JobApplication::decode(row()).unwrap();
    assert_eq!(app.notes, "");
    assert_eq!(app.contact_phone, None);
    assert_eq!(app.status, ApplicationStatus::InterviewScheduled);
  }

  #[test]
  fn test_decoding_twice_is_stable() {
    let first = JobApplication::decode(row()).unwrap();
    let second = JobApplication::decode(row()).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn test_unknown_status_is_malformed() {
    let mut bad = row();
    bad["status"] = json!("ghosted");
    let err = JobApplication::decode(bad).unwrap_err();
    assert!(err.to_string().starts_with("job_applications: malformed row"));
  }

  #[test]
  fn test_insert_blank_follow_up_is_null() {
    let new: NewJobApplication = serde_json::from_value(json!({
      "companyName": "Acme",
      "position": "Backend Engineer",
      "contactPerson": "Dana",
      "contactEmail": "dana@acme.test",
      "appliedDate": "2024-04-01",
      "followUpDate": ""
    }))
    .unwrap();
    let payload = JobApplication::insert_payload(&new);

    assert_eq!(payload.get("follow_up_date"), Some(&Value::Null));
    assert_eq!(payload.get("status"), Some(&json!("applied")));
    assert_eq!(payload.get("notes"), Some(&json!("")));
  }

  #[test]
  fn test_optional_text_can_be_cleared_to_empty() {
    let changes = ApplicationUpdate {
      contact_phone: Some(String::new()),
      ..Default::default()
    };
    let payload = JobApplication::changed_fields(&changes);
    assert_eq!(payload.get("contact_phone"), Some(&json!("")));
    assert_eq!(payload.columns().count(), 1);
  }
}
