//! List views: the filters and orderings applied to a loaded collection.
//!
//! Filtering happens client-side on the full collection returned by
//! [`crate::tracker::Repository::get_all`].

use std::cmp::Ordering;
use thiserror::Error;

use crate::records::{
  ApplicationStatus, Contact, Difficulty, Document, Entity, InterviewQuestion, InterviewTechnology,
  JobApplication, LearningCategory, LearningItem, LearningStatus, Link, LinkCategory, Note,
  Project, QuestionCategory, RecruiterCall, Resume, Todo, UnknownVariant,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
  #[error(transparent)]
  Unknown(#[from] UnknownVariant),

  #[error("--{flag} does not apply to {kind}")]
  NotApplicable { flag: &'static str, kind: &'static str },
}

/// Raw filter options as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
  pub status: Option<String>,
  pub category: Option<String>,
  pub technology: Option<String>,
  pub difficulty: Option<String>,
  /// `Some(true)` for references only, `Some(false)` for everyone else
  pub references: Option<bool>,
  pub active: bool,
  pub completed: bool,
  pub search: Option<String>,
}

impl ListFilter {
  fn search_term(&self) -> Option<String> {
    self
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_lowercase)
  }

  fn reject<E: Entity>(&self, allowed: &[&'static str]) -> Result<(), FilterError> {
    let given = [
      ("status", self.status.is_some()),
      ("category", self.category.is_some()),
      ("technology", self.technology.is_some()),
      ("difficulty", self.difficulty.is_some()),
      ("references", self.references.is_some()),
      ("active", self.active),
      ("completed", self.completed),
    ];
    for (flag, set) in given {
      if set && !allowed.contains(&flag) {
        return Err(FilterError::NotApplicable {
          flag,
          kind: E::KIND.label(),
        });
      }
    }
    Ok(())
  }
}

fn parse<T: std::str::FromStr<Err = UnknownVariant>>(
  value: &Option<String>,
) -> Result<Option<T>, UnknownVariant> {
  value.as_deref().map(str::parse).transpose()
}

fn wanted<T: PartialEq>(want: &Option<T>, have: &T) -> bool {
  want.as_ref().map_or(true, |w| w == have)
}

fn contains_term(term: &Option<String>, fields: &[Option<&str>]) -> bool {
  match term {
    None => true,
    Some(term) => fields
      .iter()
      .flatten()
      .any(|field| field.to_lowercase().contains(term.as_str())),
  }
}

/// An entity kind with a list view.
pub trait Filterable: Entity {
  /// Parsed, typed form of a [`ListFilter`] for this kind.
  type Criteria;

  fn criteria(filter: &ListFilter) -> Result<Self::Criteria, FilterError>;

  fn matches(&self, criteria: &Self::Criteria) -> bool;

  /// Display order. Defaults to the order the store returned.
  fn sort(_items: &mut [Self]) {}
}

/// Filter and order a collection for display.
pub fn apply<E: Filterable>(items: Vec<E>, filter: &ListFilter) -> Result<Vec<E>, FilterError> {
  let criteria = E::criteria(filter)?;
  let mut items: Vec<E> = items.into_iter().filter(|item| item.matches(&criteria)).collect();
  E::sort(&mut items);
  Ok(items)
}

/// Criteria for kinds that only support text search.
pub struct SearchOnly {
  term: Option<String>,
}

macro_rules! search_only {
  ($($entity:ty => |$item:ident| $fields:expr),+ $(,)?) => {
    $(
      impl Filterable for $entity {
        type Criteria = SearchOnly;

        fn criteria(filter: &ListFilter) -> Result<SearchOnly, FilterError> {
          filter.reject::<Self>(&[])?;
          Ok(SearchOnly { term: filter.search_term() })
        }

        fn matches(&self, criteria: &SearchOnly) -> bool {
          let $item = self;
          contains_term(&criteria.term, &$fields)
        }
      }
    )+
  };
}

search_only! {
  Resume => |r| [Some(r.name.as_str()), Some(r.file_name.as_str()), Some(r.resume_type.as_str())],
  Document => |d| [Some(d.name.as_str()), Some(d.file_name.as_str())],
  Note => |n| [Some(n.title.as_str()), Some(n.content.as_str())],
  Project => |p| [
    Some(p.name.as_str()),
    p.description.as_deref(),
    p.problem_statement.as_deref(),
  ],
}

pub struct ApplicationCriteria {
  status: Option<ApplicationStatus>,
  term: Option<String>,
}

impl Filterable for JobApplication {
  type Criteria = ApplicationCriteria;

  fn criteria(filter: &ListFilter) -> Result<ApplicationCriteria, FilterError> {
    filter.reject::<Self>(&["status"])?;
    Ok(ApplicationCriteria {
      status: parse(&filter.status)?,
      term: filter.search_term(),
    })
  }

  fn matches(&self, c: &ApplicationCriteria) -> bool {
    wanted(&c.status, &self.status)
      && contains_term(
        &c.term,
        &[
          Some(self.company_name.as_str()),
          Some(self.position.as_str()),
          Some(self.contact_person.as_str()),
          Some(self.notes.as_str()),
        ],
      )
  }
}

pub struct LinkCriteria {
  category: Option<LinkCategory>,
  term: Option<String>,
}

impl Filterable for Link {
  type Criteria = LinkCriteria;

  fn criteria(filter: &ListFilter) -> Result<LinkCriteria, FilterError> {
    filter.reject::<Self>(&["category"])?;
    Ok(LinkCriteria {
      category: parse(&filter.category)?,
      term: filter.search_term(),
    })
  }

  fn matches(&self, c: &LinkCriteria) -> bool {
    wanted(&c.category, &self.category)
      && contains_term(
        &c.term,
        &[
          Some(self.title.as_str()),
          Some(self.url.as_str()),
          self.description.as_deref(),
        ],
      )
  }
}

pub struct ContactCriteria {
  references: Option<bool>,
  term: Option<String>,
}

impl Filterable for Contact {
  type Criteria = ContactCriteria;

  fn criteria(filter: &ListFilter) -> Result<ContactCriteria, FilterError> {
    filter.reject::<Self>(&["references"])?;
    Ok(ContactCriteria {
      references: filter.references,
      term: filter.search_term(),
    })
  }

  fn matches(&self, c: &ContactCriteria) -> bool {
    wanted(&c.references, &self.is_reference)
      && contains_term(
        &c.term,
        &[
          Some(self.name.as_str()),
          self.company.as_deref(),
          self.role.as_deref(),
          self.email.as_deref(),
        ],
      )
  }
}

pub struct CallCriteria {
  term: Option<String>,
}

impl Filterable for RecruiterCall {
  type Criteria = CallCriteria;

  fn criteria(filter: &ListFilter) -> Result<CallCriteria, FilterError> {
    filter.reject::<Self>(&[])?;
    Ok(CallCriteria {
      term: filter.search_term(),
    })
  }

  fn matches(&self, c: &CallCriteria) -> bool {
    contains_term(
      &c.term,
      &[
        Some(self.company_name.as_str()),
        self.recruiter_name.as_deref(),
        self.position.as_deref(),
        Some(self.discussion_notes.as_str()),
      ],
    )
  }

  /// Most recent call first, by date then time.
  fn sort(items: &mut [Self]) {
    items.sort_by(|a, b| {
      (b.call_date.as_str(), b.call_time.as_str()).cmp(&(a.call_date.as_str(), a.call_time.as_str()))
    });
  }
}

pub struct LearningCriteria {
  category: Option<LearningCategory>,
  status: Option<LearningStatus>,
  term: Option<String>,
}

impl Filterable for LearningItem {
  type Criteria = LearningCriteria;

  fn criteria(filter: &ListFilter) -> Result<LearningCriteria, FilterError> {
    filter.reject::<Self>(&["category", "status"])?;
    Ok(LearningCriteria {
      category: parse(&filter.category)?,
      status: parse(&filter.status)?,
      term: filter.search_term(),
    })
  }

  fn matches(&self, c: &LearningCriteria) -> bool {
    wanted(&c.category, &self.category)
      && wanted(&c.status, &self.status)
      && contains_term(&c.term, &[Some(self.title.as_str()), self.notes.as_deref()])
  }
}

pub struct TodoCriteria {
  completed: Option<bool>,
  term: Option<String>,
}

impl Filterable for Todo {
  type Criteria = TodoCriteria;

  fn criteria(filter: &ListFilter) -> Result<TodoCriteria, FilterError> {
    filter.reject::<Self>(&["active", "completed"])?;
    let completed = match (filter.active, filter.completed) {
      (true, false) => Some(false),
      (false, true) => Some(true),
      _ => None,
    };
    Ok(TodoCriteria {
      completed,
      term: filter.search_term(),
    })
  }

  fn matches(&self, c: &TodoCriteria) -> bool {
    wanted(&c.completed, &self.completed)
      && contains_term(&c.term, &[Some(self.title.as_str()), self.description.as_deref()])
  }

  /// Open before done, then by priority, then soonest due, then newest.
  fn sort(items: &mut [Self]) {
    items.sort_by(compare_todos);
  }
}

fn compare_todos(a: &Todo, b: &Todo) -> Ordering {
  a.completed
    .cmp(&b.completed)
    .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
    .then_with(|| match (a.due_date.as_deref(), b.due_date.as_deref()) {
      (Some(x), Some(y)) => x.cmp(y),
      (Some(_), None) => Ordering::Less,
      (None, Some(_)) => Ordering::Greater,
      (None, None) => b.created_at.cmp(&a.created_at),
    })
}

pub struct QuestionCriteria {
  category: Option<QuestionCategory>,
  technology: Option<InterviewTechnology>,
  difficulty: Option<Difficulty>,
  term: Option<String>,
}

impl Filterable for InterviewQuestion {
  type Criteria = QuestionCriteria;

  fn criteria(filter: &ListFilter) -> Result<QuestionCriteria, FilterError> {
    filter.reject::<Self>(&["category", "technology", "difficulty"])?;
    Ok(QuestionCriteria {
      category: parse(&filter.category)?,
      technology: parse(&filter.technology)?,
      difficulty: parse(&filter.difficulty)?,
      term: filter.search_term(),
    })
  }

  fn matches(&self, c: &QuestionCriteria) -> bool {
    wanted(&c.category, &self.category)
      && wanted(&c.technology, &self.technology)
      && wanted(&c.difficulty, &self.difficulty)
      && contains_term(
        &c.term,
        &[
          Some(self.question.as_str()),
          self.answer.as_deref(),
          self.tags.as_deref(),
        ],
      )
  }
}
