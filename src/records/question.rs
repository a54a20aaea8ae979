use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
  non_empty, Difficulty, Entity, EntityKind, InterviewTechnology, Payload, QuestionCategory,
};

/// A practice question with its prepared answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
  pub id: String,
  pub question: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub answer: Option<String>,
  pub category: QuestionCategory,
  pub technology: InterviewTechnology,
  pub difficulty: Difficulty,
  /// Comma separated.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tags: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  pub times_practiced: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_practiced_date: Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct InterviewQuestionRow {
  id: String,
  question: String,
  #[serde(default)]
  answer: Option<String>,
  category: QuestionCategory,
  technology: InterviewTechnology,
  difficulty: Difficulty,
  #[serde(default)]
  tags: Option<String>,
  #[serde(default)]
  notes: Option<String>,
  #[serde(default)]
  times_practiced: Option<u32>,
  #[serde(default)]
  last_practiced_date: Option<String>,
  created_at: String,
  updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterviewQuestion {
  pub question: String,
  #[serde(default)]
  pub answer: Option<String>,
  #[serde(default)]
  pub category: QuestionCategory,
  #[serde(default)]
  pub technology: InterviewTechnology,
  #[serde(default)]
  pub difficulty: Difficulty,
  #[serde(default)]
  pub tags: Option<String>,
  #[serde(default)]
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestionUpdate {
  pub question: Option<String>,
  pub answer: Option<String>,
  pub category: Option<QuestionCategory>,
  pub technology: Option<InterviewTechnology>,
  pub difficulty: Option<Difficulty>,
  pub tags: Option<String>,
  pub notes: Option<String>,
  pub times_practiced: Option<u32>,
  pub last_practiced_date: Option<String>,
}

impl InterviewQuestionUpdate {
  /// Bump the practice counter and stamp today's date.
  pub fn practiced(question: &InterviewQuestion, today: NaiveDate) -> Self {
    InterviewQuestionUpdate {
      times_practiced: Some(question.times_practiced.saturating_add(1)),
      last_practiced_date: Some(today.format("%Y-%m-%d").to_string()),
      ..Default::default()
    }
  }
}

impl Entity for InterviewQuestion {
  const KIND: EntityKind = EntityKind::InterviewQuestion;
  type Row = InterviewQuestionRow;
  type New = NewInterviewQuestion;
  type Update = InterviewQuestionUpdate;

  fn id(&self) -> &str {
    &self.id
  }

  fn from_row(row: InterviewQuestionRow) -> Self {
    InterviewQuestion {
      id: row.id,
      question: row.question,
      answer: row.answer,
      category: row.category,
      technology: row.technology,
      difficulty: row.difficulty,
      tags: row.tags,
      notes: row.notes,
      times_practiced: row.times_practiced.unwrap_or(0),
      last_practiced_date: row.last_practiced_date,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }

  fn insert_payload(new: &NewInterviewQuestion) -> Payload {
    let mut payload = Payload::new();
    payload
      .set("question", new.question.as_str())
      .set_optional("answer", new.answer.as_deref())
      .set("category", new.category)
      .set("technology", new.technology)
      .set("difficulty", new.difficulty)
      .set_optional("tags", new.tags.as_deref())
      .set_optional("notes", new.notes.as_deref());
    payload
  }

  fn changed_fields(changes: &InterviewQuestionUpdate) -> Payload {
    let mut payload = Payload::new();
    if let Some(question) = non_empty(&changes.question) {
      payload.set("question", question);
    }
    if let Some(answer) = &changes.answer {
      payload.set("answer", answer.as_str());
    }
    if let Some(category) = changes.category {
      payload.set("category", category);
    }
    if let Some(technology) = changes.technology {
      payload.set("technology", technology);
    }
    if let Some(difficulty) = changes.difficulty {
      payload.set("difficulty", difficulty);
    }
    if let Some(tags) = &changes.tags {
      payload.set("tags", tags.as_str());
    }
    if let Some(notes) = &changes.notes {
      payload.set("notes", notes.as_str());
    }
    if let Some(times_practiced) = changes.times_practiced {
      payload.set("times_practiced", times_practiced);
    }
    if let Some(last_practiced_date) = &changes.last_practiced_date {
      payload.set_date("last_practiced_date", Some(last_practiced_date.as_str()));
    }
    payload
  }
}
