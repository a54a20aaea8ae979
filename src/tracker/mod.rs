//! Entity access facade.
//!
//! A [`Tracker`] owns one [`Repository`] per entity kind, all sharing a
//! single store.

mod repository;
mod summary;

use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;

use crate::config::{Backend, Config};
use crate::records::{
  Contact, Document, Entity, InterviewQuestion, JobApplication, LearningItem, Link, Note, Project,
  RecruiterCall, Resume, Todo,
};
use crate::store::{RecordStore, RestStore, SqliteStore};

pub use repository::Repository;
pub use summary::Summary;

pub struct Tracker {
  resumes: Repository<Resume>,
  applications: Repository<JobApplication>,
  documents: Repository<Document>,
  links: Repository<Link>,
  contacts: Repository<Contact>,
  calls: Repository<RecruiterCall>,
  learning: Repository<LearningItem>,
  notes: Repository<Note>,
  todos: Repository<Todo>,
  projects: Repository<Project>,
  questions: Repository<InterviewQuestion>,
}

impl Tracker {
  pub fn new(store: Arc<dyn RecordStore>, ttl: Option<chrono::Duration>) -> Self {
    Self {
      resumes: Repository::new(store.clone(), ttl),
      applications: Repository::new(store.clone(), ttl),
      documents: Repository::new(store.clone(), ttl),
      links: Repository::new(store.clone(), ttl),
      contacts: Repository::new(store.clone(), ttl),
      calls: Repository::new(store.clone(), ttl),
      learning: Repository::new(store.clone(), ttl),
      notes: Repository::new(store.clone(), ttl),
      todos: Repository::new(store.clone(), ttl),
      projects: Repository::new(store.clone(), ttl),
      questions: Repository::new(store, ttl),
    }
  }

  /// Build the configured store and wrap it.
  pub fn from_config(config: &Config) -> Result<Self> {
    let store: Arc<dyn RecordStore> = match config.store.backend {
      Backend::Rest => {
        let url = config
          .store
          .url
          .as_deref()
          .ok_or_else(|| eyre!("store.url is required for the rest backend"))?;
        let key = Config::get_store_key()?;
        Arc::new(RestStore::new(url, &key)?)
      }
      Backend::Sqlite => {
        let path = config.sqlite_path()?;
        if let Some(parent) = path.parent() {
          std::fs::create_dir_all(parent)
            .map_err(|e| eyre!("Failed to create data directory: {}", e))?;
        }
        let store = SqliteStore::open(&path)
          .map_err(|e| eyre!("Failed to open database at {}: {}", path.display(), e))?;
        Arc::new(store)
      }
    };

    Ok(Self::new(store, config.cache_ttl()))
  }

  pub fn resumes(&self) -> &Repository<Resume> {
    &self.resumes
  }

  pub fn applications(&self) -> &Repository<JobApplication> {
    &self.applications
  }

  pub fn documents(&self) -> &Repository<Document> {
    &self.documents
  }

  pub fn links(&self) -> &Repository<Link> {
    &self.links
  }

  pub fn contacts(&self) -> &Repository<Contact> {
    &self.contacts
  }

  pub fn calls(&self) -> &Repository<RecruiterCall> {
    &self.calls
  }

  pub fn learning(&self) -> &Repository<LearningItem> {
    &self.learning
  }

  pub fn notes(&self) -> &Repository<Note> {
    &self.notes
  }

  pub fn todos(&self) -> &Repository<Todo> {
    &self.todos
  }

  pub fn projects(&self) -> &Repository<Project> {
    &self.projects
  }

  pub fn questions(&self) -> &Repository<InterviewQuestion> {
    &self.questions
  }

  /// The repository for `E`, for code generic over entity kinds.
  pub fn repository<E: Tracked>(&self) -> &Repository<E> {
    E::repository(self)
  }

  /// Drop every cached collection.
  pub fn invalidate_all(&self) {
    self.resumes.invalidate();
    self.applications.invalidate();
    self.documents.invalidate();
    self.links.invalidate();
    self.contacts.invalidate();
    self.calls.invalidate();
    self.learning.invalidate();
    self.notes.invalidate();
    self.todos.invalidate();
    self.projects.invalidate();
    self.questions.invalidate();
    tracing::debug!("invalidated all caches");
  }
}

/// An entity kind the tracker holds a repository for.
pub trait Tracked: Entity {
  fn repository(tracker: &Tracker) -> &Repository<Self>;
}

macro_rules! tracked {
  ($($entity:ty => $field:ident),+ $(,)?) => {
    $(
      impl Tracked for $entity {
        fn repository(tracker: &Tracker) -> &Repository<Self> {
          &tracker.$field
        }
      }
    )+
  };
}

tracked! {
  Resume => resumes,
  JobApplication => applications,
  Document => documents,
  Link => links,
  Contact => contacts,
  RecruiterCall => calls,
  LearningItem => learning,
  Note => notes,
  Todo => todos,
  Project => projects,
  InterviewQuestion => questions,
}
