//! Record transform layer.
//!
//! Every entity kind has three shapes:
//! - a row type matching the store's snake_case columns (what comes back),
//! - the application type callers work with (serialized as camelCase),
//! - `New*` / `*Update` inputs that are turned into insert and update payloads.
//!
//! Rows are decoded against an explicit schema so a row that does not match
//! fails with [`StoreError::MalformedRow`] instead of leaking half-filled
//! records into the views.

mod application;
mod call;
mod contact;
mod document;
mod enums;
mod learning;
mod link;
mod note;
mod project;
mod question;
mod resume;
mod todo;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

pub use application::{ApplicationUpdate, JobApplication, NewJobApplication};
pub use call::{NewRecruiterCall, RecruiterCall, RecruiterCallUpdate};
pub use contact::{Contact, ContactUpdate, NewContact};
pub use document::{Document, DocumentUpdate, NewDocument};
pub use enums::{
  ApplicationStatus, CallStatus, Difficulty, DocumentType, InterviewTechnology, LearningCategory,
  LearningStatus, LinkCategory, Priority, QuestionCategory, ResumeType, UnknownVariant,
};
pub use learning::{LearningItem, LearningItemUpdate, NewLearningItem};
pub use link::{Link, LinkUpdate, NewLink};
pub use note::{NewNote, Note, NoteUpdate};
pub use project::{NewProject, Project, ProjectFile, ProjectUpdate};
pub use question::{InterviewQuestion, InterviewQuestionUpdate, NewInterviewQuestion};
pub use resume::{NewResume, Resume, ResumeUpdate};
pub use todo::{NewTodo, Todo, TodoUpdate};

/// The eleven record types tracked by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
  Resume,
  JobApplication,
  Document,
  Link,
  Contact,
  RecruiterCall,
  LearningItem,
  Note,
  Todo,
  Project,
  InterviewQuestion,
}

impl EntityKind {
  pub const ALL: [EntityKind; 11] = [
    EntityKind::Resume,
    EntityKind::JobApplication,
    EntityKind::Document,
    EntityKind::Link,
    EntityKind::Contact,
    EntityKind::RecruiterCall,
    EntityKind::LearningItem,
    EntityKind::Note,
    EntityKind::Todo,
    EntityKind::Project,
    EntityKind::InterviewQuestion,
  ];

  /// Table name in the store.
  pub fn table(self) -> &'static str {
    match self {
      EntityKind::Resume => "resumes",
      EntityKind::JobApplication => "job_applications",
      EntityKind::Document => "documents",
      EntityKind::Link => "links",
      EntityKind::Contact => "contacts",
      EntityKind::RecruiterCall => "recruiter_calls",
      EntityKind::LearningItem => "learning_items",
      EntityKind::Note => "notes",
      EntityKind::Todo => "todos",
      EntityKind::Project => "projects",
      EntityKind::InterviewQuestion => "interview_questions",
    }
  }

  /// Recency columns the full collection is ordered by, all descending.
  pub fn order(self) -> &'static [&'static str] {
    match self {
      EntityKind::Resume | EntityKind::Document => &["uploaded_at"],
      EntityKind::JobApplication => &["applied_date"],
      EntityKind::RecruiterCall => &["call_date", "call_time"],
      _ => &["created_at"],
    }
  }

  /// Human readable plural, used in logs and CLI output.
  pub fn label(self) -> &'static str {
    match self {
      EntityKind::Resume => "resumes",
      EntityKind::JobApplication => "applications",
      EntityKind::Document => "documents",
      EntityKind::Link => "links",
      EntityKind::Contact => "contacts",
      EntityKind::RecruiterCall => "recruiter calls",
      EntityKind::LearningItem => "learning items",
      EntityKind::Note => "notes",
      EntityKind::Todo => "todos",
      EntityKind::Project => "projects",
      EntityKind::InterviewQuestion => "interview questions",
    }
  }
}

impl std::fmt::Display for EntityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// An entity kind together with its transforms.
///
/// `from_row` is total over a decoded row; all validation happens when the
/// raw JSON is decoded into `Self::Row`.
pub trait Entity: Clone + Send + Sync + Serialize + 'static {
  const KIND: EntityKind;

  /// Storage row schema.
  type Row: DeserializeOwned;
  /// Fields a caller supplies on create.
  type New: Send + Sync;
  /// Sparse set of field changes.
  type Update: Send + Sync;

  fn id(&self) -> &str;

  fn from_row(row: Self::Row) -> Self;

  fn insert_payload(new: &Self::New) -> Payload;

  /// Columns touched by `changes`, without the `updated_at` stamp.
  fn changed_fields(changes: &Self::Update) -> Payload;

  fn update_payload(changes: &Self::Update, now: DateTime<Utc>) -> Payload {
    let mut payload = Self::changed_fields(changes);
    payload.touch(now);
    payload
  }

  /// Decode a raw store row into the application type.
  fn decode(value: Value) -> Result<Self, StoreError> {
    serde_json::from_value::<Self::Row>(value)
      .map(Self::from_row)
      .map_err(|source| StoreError::MalformedRow {
        table: Self::KIND.table(),
        source,
      })
  }
}

/// Column/value map sent to the store on insert or update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
    self.0.insert(column.to_string(), value.into());
    self
  }

  /// Absent values are written as null.
  pub fn set_optional<V: Into<Value>>(&mut self, column: &str, value: Option<V>) -> &mut Self {
    let value = value.map(Into::into).unwrap_or(Value::Null);
    self.0.insert(column.to_string(), value);
    self
  }

  /// Absent or empty text is written as null.
  pub fn set_blank_as_null(&mut self, column: &str, value: Option<&str>) -> &mut Self {
    self.set_optional(column, value.filter(|v| !v.is_empty()))
  }

  /// Dates left blank in a form are stored as "no date", never as `""`.
  pub fn set_date(&mut self, column: &str, value: Option<&str>) -> &mut Self {
    self.set_optional(column, value.filter(|v| !v.trim().is_empty()))
  }

  /// Stamp `updated_at` with the given time.
  pub fn touch(&mut self, now: DateTime<Utc>) -> &mut Self {
    self.set(
      "updated_at",
      now.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
  }

  pub fn get(&self, column: &str) -> Option<&Value> {
    self.0.get(column)
  }

  pub fn contains(&self, column: &str) -> bool {
    self.0.contains_key(column)
  }

  pub fn columns(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn into_map(self) -> Map<String, Value> {
    self.0
  }
}

/// A required text field counts as changed only when it is non-empty.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|v| !v.is_empty())
}
