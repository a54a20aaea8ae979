use serde::Serialize;
use std::collections::BTreeMap;

use super::Tracker;
use crate::cache::Listing;
use crate::records::CallStatus;

/// Dashboard counts.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  pub resumes: usize,
  pub applications: usize,
  pub documents: usize,
  pub links: usize,
  pub contacts: usize,
  pub calls: usize,
  pub learning_items: usize,
  pub notes: usize,
  pub todos: usize,
  pub projects: usize,
  pub interview_questions: usize,
  pub applications_by_status: BTreeMap<String, usize>,
  pub active_todos: usize,
  pub calls_awaiting_follow_up: usize,
  /// Kinds that could not be loaded; their counts read as zero.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub unavailable: Vec<&'static str>,
}

fn note_failure<T>(listing: &Listing<T>, label: &'static str, unavailable: &mut Vec<&'static str>) {
  if listing.is_unavailable() {
    unavailable.push(label);
  }
}

impl Tracker {
  /// Load every collection concurrently and count them.
  pub async fn summary(&self) -> Summary {
    let (
      resumes,
      applications,
      documents,
      links,
      contacts,
      calls,
      learning,
      notes,
      todos,
      projects,
      questions,
    ) = futures::join!(
      self.resumes.get_all(),
      self.applications.get_all(),
      self.documents.get_all(),
      self.links.get_all(),
      self.contacts.get_all(),
      self.calls.get_all(),
      self.learning.get_all(),
      self.notes.get_all(),
      self.todos.get_all(),
      self.projects.get_all(),
      self.questions.get_all(),
    );

    let mut unavailable = Vec::new();
    note_failure(&resumes, "resumes", &mut unavailable);
    note_failure(&applications, "applications", &mut unavailable);
    note_failure(&documents, "documents", &mut unavailable);
    note_failure(&links, "links", &mut unavailable);
    note_failure(&contacts, "contacts", &mut unavailable);
    note_failure(&calls, "calls", &mut unavailable);
    note_failure(&learning, "learning items", &mut unavailable);
    note_failure(&notes, "notes", &mut unavailable);
    note_failure(&todos, "todos", &mut unavailable);
    note_failure(&projects, "projects", &mut unavailable);
    note_failure(&questions, "interview questions", &mut unavailable);

    let mut applications_by_status = BTreeMap::new();
    for app in &applications.items {
      *applications_by_status
        .entry(app.status.to_string())
        .or_insert(0) += 1;
    }

    Summary {
      resumes: resumes.len(),
      applications: applications.len(),
      documents: documents.len(),
      links: links.len(),
      contacts: contacts.len(),
      calls: calls.len(),
      learning_items: learning.len(),
      notes: notes.len(),
      todos: todos.len(),
      projects: projects.len(),
      interview_questions: questions.len(),
      applications_by_status,
      active_todos: todos.items.iter().filter(|t| !t.completed).count(),
      calls_awaiting_follow_up: calls
        .items
        .iter()
        .filter(|c| c.status == CallStatus::Pending)
        .count(),
      unavailable,
    }
  }
}
