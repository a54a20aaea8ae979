//! Command line surface over the tracker.

use clap::{Args as ClapArgs, Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::PathBuf;

use crate::filters::{self, Filterable, ListFilter};
use crate::kinds::{self, KINDS};
use crate::records::{
  Contact, Document, EntityKind, InterviewQuestion, InterviewQuestionUpdate, JobApplication,
  LearningItem, Link, Note, Project, RecruiterCall, RecruiterCallUpdate, Resume, Todo, TodoUpdate,
};
use crate::tracker::{Tracked, Tracker};

#[derive(Parser, Debug)]
#[command(name = "jobhunt")]
#[command(about = "Track job applications, contacts, calls and interview prep")]
#[command(version)]
pub struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/jobhunt/config.yaml)
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// List entity kinds and their aliases
  Kinds,
  /// List records of a kind, most recent first
  List {
    kind: String,
    #[command(flatten)]
    filter: FilterArgs,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
  },
  /// Show one record as JSON
  Show { kind: String, id: String },
  /// Create a record from camelCase JSON
  Add {
    kind: String,
    #[command(flatten)]
    input: InputArgs,
  },
  /// Change some fields of a record
  Update {
    kind: String,
    id: String,
    #[command(flatten)]
    input: InputArgs,
  },
  Delete { kind: String, id: String },
  /// Dashboard counts
  Summary {
    #[arg(long)]
    json: bool,
  },
  /// Mark a recruiter call as followed up
  FollowUp {
    id: String,
    #[arg(long)]
    undo: bool,
  },
  /// Record a practice run of an interview question
  Practiced { id: String },
  /// Mark a todo as completed
  Done {
    id: String,
    #[arg(long)]
    undo: bool,
  },
}

#[derive(ClapArgs, Debug, Default)]
pub struct FilterArgs {
  #[arg(long)]
  pub status: Option<String>,
  #[arg(long)]
  pub category: Option<String>,
  #[arg(long)]
  pub technology: Option<String>,
  #[arg(long)]
  pub difficulty: Option<String>,
  /// Only contacts flagged as references
  #[arg(long, conflicts_with = "non_references")]
  pub references: bool,
  /// Only contacts not flagged as references
  #[arg(long)]
  pub non_references: bool,
  /// Only open todos
  #[arg(long, conflicts_with = "completed")]
  pub active: bool,
  #[arg(long)]
  pub completed: bool,
  /// Case-insensitive text search
  #[arg(long)]
  pub search: Option<String>,
}

impl From<FilterArgs> for ListFilter {
  fn from(args: FilterArgs) -> Self {
    let references = match (args.references, args.non_references) {
      (true, _) => Some(true),
      (_, true) => Some(false),
      _ => None,
    };
    ListFilter {
      status: args.status,
      category: args.category,
      technology: args.technology,
      difficulty: args.difficulty,
      references,
      active: args.active,
      completed: args.completed,
      search: args.search,
    }
  }
}

#[derive(ClapArgs, Debug)]
pub struct InputArgs {
  /// Inline JSON object
  #[arg(long, conflicts_with = "file", required_unless_present = "file")]
  pub data: Option<String>,
  /// File holding a JSON object
  #[arg(long)]
  pub file: Option<PathBuf>,
}

impl InputArgs {
  fn parse<T: DeserializeOwned>(&self) -> Result<T> {
    let text = match (&self.data, &self.file) {
      (Some(data), _) => data.clone(),
      (None, Some(path)) => std::fs::read_to_string(path)
        .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?,
      (None, None) => return Err(eyre!("Pass --data or --file")),
    };
    serde_json::from_str(&text).map_err(|e| eyre!("Invalid input: {}", e))
  }
}

/// One line per record in `list` output.
pub trait Tabular {
  const HEADERS: &'static [&'static str];
  fn cells(&self) -> Vec<String>;
}

fn opt(value: &Option<String>) -> String {
  value.clone().unwrap_or_default()
}

impl Tabular for Resume {
  const HEADERS: &'static [&'static str] = &["ID", "NAME", "TYPE", "FILE", "UPLOADED"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.name.clone(),
      self.resume_type.to_string(),
      self.file_name.clone(),
      self.uploaded_at.clone(),
    ]
  }
}

impl Tabular for JobApplication {
  const HEADERS: &'static [&'static str] = &["ID", "COMPANY", "POSITION", "STATUS", "APPLIED", "FOLLOW-UP"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.company_name.clone(),
      self.position.clone(),
      self.status.to_string(),
      self.applied_date.clone(),
      opt(&self.follow_up_date),
    ]
  }
}

impl Tabular for Document {
  const HEADERS: &'static [&'static str] = &["ID", "NAME", "TYPE", "FILE", "UPLOADED"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.name.clone(),
      self.document_type.to_string(),
      self.file_name.clone(),
      self.uploaded_at.clone(),
    ]
  }
}

impl Tabular for Link {
  const HEADERS: &'static [&'static str] = &["ID", "TITLE", "CATEGORY", "URL"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.title.clone(),
      self.category.to_string(),
      self.url.clone(),
    ]
  }
}

impl Tabular for Contact {
  const HEADERS: &'static [&'static str] = &["ID", "NAME", "COMPANY", "ROLE", "EMAIL", "REF"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.name.clone(),
      opt(&self.company),
      opt(&self.role),
      opt(&self.email),
      if self.is_reference { "yes" } else { "" }.to_string(),
    ]
  }
}

impl Tabular for RecruiterCall {
  const HEADERS: &'static [&'static str] = &["ID", "COMPANY", "RECRUITER", "DATE", "TIME", "STATUS"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.company_name.clone(),
      opt(&self.recruiter_name),
      self.call_date.clone(),
      self.call_time.clone(),
      self.status.to_string(),
    ]
  }
}

impl Tabular for LearningItem {
  const HEADERS: &'static [&'static str] = &["ID", "TITLE", "CATEGORY", "STATUS"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.title.clone(),
      self.category.to_string(),
      self.status.to_string(),
    ]
  }
}

impl Tabular for Note {
  const HEADERS: &'static [&'static str] = &["ID", "TITLE", "UPDATED"];
  fn cells(&self) -> Vec<String> {
    vec![self.id.clone(), self.title.clone(), self.updated_at.clone()]
  }
}

impl Tabular for Todo {
  const HEADERS: &'static [&'static str] = &["ID", "DONE", "PRIORITY", "DUE", "TITLE"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      if self.completed { "x" } else { " " }.to_string(),
      self.priority.to_string(),
      opt(&self.due_date),
      self.title.clone(),
    ]
  }
}

impl Tabular for Project {
  const HEADERS: &'static [&'static str] = &["ID", "NAME", "FILES", "GITHUB"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.name.clone(),
      self.files.len().to_string(),
      self.github_link.clone(),
    ]
  }
}

impl Tabular for InterviewQuestion {
  const HEADERS: &'static [&'static str] = &["ID", "TECH", "DIFFICULTY", "PRACTICED", "QUESTION"];
  fn cells(&self) -> Vec<String> {
    vec![
      self.id.clone(),
      self.technology.to_string(),
      self.difficulty.to_string(),
      self.times_practiced.to_string(),
      self.question.clone(),
    ]
  }
}

fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
  let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
  for row in rows {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(cell.chars().count());
    }
  }

  let line = |cells: Vec<&str>| {
    cells
      .iter()
      .zip(&widths)
      .map(|(cell, &width)| format!("{cell:<width$}"))
      .collect::<Vec<_>>()
      .join("  ")
      .trim_end()
      .to_string()
  };

  writeln!(out, "{}", line(headers.to_vec()))?;
  for row in rows {
    writeln!(out, "{}", line(row.iter().map(String::as_str).collect()))?;
  }
  Ok(())
}

/// Run `$body` with `$E` bound to the record type of `$kind`.
macro_rules! with_kind {
  ($kind:expr, $E:ident => $body:expr) => {
    match $kind {
      EntityKind::Resume => {
        type $E = Resume;
        $body
      }
      EntityKind::JobApplication => {
        type $E = JobApplication;
        $body
      }
      EntityKind::Document => {
        type $E = Document;
        $body
      }
      EntityKind::Link => {
        type $E = Link;
        $body
      }
      EntityKind::Contact => {
        type $E = Contact;
        $body
      }
      EntityKind::RecruiterCall => {
        type $E = RecruiterCall;
        $body
      }
      EntityKind::LearningItem => {
        type $E = LearningItem;
        $body
      }
      EntityKind::Note => {
        type $E = Note;
        $body
      }
      EntityKind::Todo => {
        type $E = Todo;
        $body
      }
      EntityKind::Project => {
        type $E = Project;
        $body
      }
      EntityKind::InterviewQuestion => {
        type $E = InterviewQuestion;
        $body
      }
    }
  };
}

fn resolve_kind(input: &str) -> Result<EntityKind> {
  kinds::resolve(input).ok_or_else(|| {
    let names: Vec<_> = KINDS.iter().map(|k| k.name).collect();
    eyre!("Unknown kind '{}'. Known kinds: {}", input, names.join(", "))
  })
}

fn write_json<W: Write, T: serde::Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
  writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
  Ok(())
}

async fn list<E, W>(tracker: &Tracker, filter: ListFilter, json: bool, out: &mut W) -> Result<()>
where
  E: Tracked + Filterable + Tabular,
  W: Write,
{
  let mut listing = tracker.repository::<E>().get_all().await;
  if let Some(error) = listing.error.take() {
    return Err(eyre!("Failed to load {}: {}", E::KIND, error));
  }

  let items = filters::apply(listing.items, &filter)?;
  if json {
    return write_json(out, &items);
  }

  let rows: Vec<_> = items.iter().map(Tabular::cells).collect();
  write_table(out, E::HEADERS, &rows)
}

async fn show<E: Tracked, W: Write>(tracker: &Tracker, id: &str, out: &mut W) -> Result<()> {
  let record = tracker
    .repository::<E>()
    .get(id)
    .await?
    .ok_or_else(|| eyre!("No {} with id {}", E::KIND, id))?;
  write_json(out, &record)
}

async fn add<E, W>(tracker: &Tracker, input: &InputArgs, out: &mut W) -> Result<()>
where
  E: Tracked,
  E::New: DeserializeOwned,
  W: Write,
{
  let new: E::New = input.parse()?;
  let record = tracker.repository::<E>().create(&new).await?;
  write_json(out, &record)
}

async fn update<E, W>(tracker: &Tracker, id: &str, input: &InputArgs, out: &mut W) -> Result<()>
where
  E: Tracked,
  E::Update: DeserializeOwned,
  W: Write,
{
  let changes: E::Update = input.parse()?;
  let record = tracker.repository::<E>().update(id, &changes).await?;
  write_json(out, &record)
}

fn write_summary<W: Write>(out: &mut W, summary: &crate::tracker::Summary) -> Result<()> {
  let counts = [
    ("resumes", summary.resumes),
    ("applications", summary.applications),
    ("documents", summary.documents),
    ("links", summary.links),
    ("contacts", summary.contacts),
    ("calls", summary.calls),
    ("learning", summary.learning_items),
    ("notes", summary.notes),
    ("todos", summary.todos),
    ("projects", summary.projects),
    ("questions", summary.interview_questions),
  ];
  for (label, count) in counts {
    writeln!(out, "{label:<14}{count}")?;
  }

  writeln!(out)?;
  for (status, count) in &summary.applications_by_status {
    writeln!(out, "  {status:<20}{count}")?;
  }
  writeln!(out, "active todos          {}", summary.active_todos)?;
  writeln!(out, "calls to follow up    {}", summary.calls_awaiting_follow_up)?;

  if !summary.unavailable.is_empty() {
    writeln!(out, "\nfailed to load: {}", summary.unavailable.join(", "))?;
  }
  Ok(())
}

/// Execute one command, writing its output to `out`.
pub async fn run<W: Write>(command: Command, tracker: &Tracker, out: &mut W) -> Result<()> {
  match command {
    Command::Kinds => {
      for entry in KINDS {
        writeln!(
          out,
          "{:<14}{:<36}{}",
          entry.name,
          entry.aliases.join(", "),
          entry.description
        )?;
      }
      Ok(())
    }
    Command::List { kind, filter, json } => {
      let filter = ListFilter::from(filter);
      with_kind!(resolve_kind(&kind)?, E => list::<E, W>(tracker, filter, json, out).await)
    }
    Command::Show { kind, id } => {
      with_kind!(resolve_kind(&kind)?, E => show::<E, W>(tracker, &id, out).await)
    }
    Command::Add { kind, input } => {
      with_kind!(resolve_kind(&kind)?, E => add::<E, W>(tracker, &input, out).await)
    }
    Command::Update { kind, id, input } => {
      with_kind!(resolve_kind(&kind)?, E => update::<E, W>(tracker, &id, &input, out).await)
    }
    Command::Delete { kind, id } => {
      let kind = resolve_kind(&kind)?;
      with_kind!(kind, E => tracker.repository::<E>().delete(&id).await)?;
      writeln!(out, "deleted {} {}", kind, id)?;
      Ok(())
    }
    Command::Summary { json } => {
      let summary = tracker.summary().await;
      if json {
        write_json(out, &summary)
      } else {
        write_summary(out, &summary)
      }
    }
    Command::FollowUp { id, undo } => {
      let call = tracker
        .calls()
        .update(&id, &RecruiterCallUpdate::follow_up(!undo))
        .await?;
      writeln!(out, "{} {}: {}", call.company_name, call.call_date, call.status)?;
      Ok(())
    }
    Command::Practiced { id } => {
      let question = tracker
        .questions()
        .get(&id)
        .await?
        .ok_or_else(|| eyre!("No interview question with id {}", id))?;
      let today = chrono::Local::now().date_naive();
      let changes = InterviewQuestionUpdate::practiced(&question, today);
      let question = tracker.questions().update(&id, &changes).await?;
      writeln!(out, "practiced {} time(s)", question.times_practiced)?;
      Ok(())
    }
    Command::Done { id, undo } => {
      let changes = TodoUpdate {
        completed: Some(!undo),
        ..Default::default()
      };
      let todo = tracker.todos().update(&id, &changes).await?;
      let mark = if todo.completed { "x" } else { " " };
      writeln!(out, "[{mark}] {}", todo.title)?;
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::{RecordStore, SqliteStore};
  use clap::CommandFactory;
  use serde_json::{json, Value};
  use std::sync::Arc;

  fn tracker() -> Tracker {
    let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::in_memory().unwrap());
    Tracker::new(store, None)
  }

  fn parse(args: &[&str]) -> Command {
    let mut argv = vec!["jobhunt"];
    argv.extend_from_slice(args);
    Args::try_parse_from(argv).unwrap().command
  }

  async fn exec(tracker: &Tracker, args: &[&str]) -> String {
    let mut out = Vec::new();
    run(parse(args), tracker, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_cli_definition() {
    Args::command().debug_assert();
  }

  #[test]
  fn test_input_is_required() {
    assert!(Args::try_parse_from(["jobhunt", "add", "todos"]).is_err());
    assert!(
      Args::try_parse_from(["jobhunt", "add", "todos", "--data", "{}", "--file", "x.json"]).is_err()
    );
  }

  #[tokio::test]
  async fn test_add_list_done() {
    let tracker = tracker();
    let created = exec(&tracker, &["add", "todo", "--data", r#"{"title":"Buy milk","dueDate":""}"#]).await;
    let created: Value = serde_json::from_str(&created).unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created.get("dueDate").is_none());

    let table = exec(&tracker, &["list", "todos", "--active"]).await;
    assert!(table.starts_with("ID"));
    assert!(table.contains("Buy milk"));

    let done = exec(&tracker, &["done", id.as_str()]).await;
    assert_eq!(done.trim(), "[x] Buy milk");

    let table = exec(&tracker, &["list", "todos", "--active"]).await;
    assert!(!table.contains("Buy milk"));
  }

  #[tokio::test]
  async fn test_follow_up_writes_status() {
    let tracker = tracker();
    let created = exec(
      &tracker,
      &[
        "add",
        "calls",
        "--data",
        r#"{"companyName":"Globex","callDate":"2024-06-10","callTime":"14:30"}"#,
      ],
    )
    .await;
    let id = serde_json::from_str::<Value>(&created).unwrap()["id"]
      .as_str()
      .unwrap()
      .to_string();

    exec(&tracker, &["follow-up", id.as_str()]).await;
    let shown: Value = serde_json::from_str(&exec(&tracker, &["show", "calls", id.as_str()]).await).unwrap();
    assert_eq!(shown["followUpHappened"], json!(true));
    assert_eq!(shown["status"], json!("followed-up"));
  }

  #[tokio::test]
  async fn test_practiced_increments() {
    let tracker = tracker();
    let created = exec(
      &tracker,
      &["add", "q", "--data", r#"{"question":"What is a lifetime?","technology":"other"}"#],
    )
    .await;
    let id = serde_json::from_str::<Value>(&created).unwrap()["id"]
      .as_str()
      .unwrap()
      .to_string();

    assert_eq!(exec(&tracker, &["practiced", id.as_str()]).await.trim(), "practiced 1 time(s)");
    assert_eq!(exec(&tracker, &["practiced", id.as_str()]).await.trim(), "practiced 2 time(s)");
  }

  #[tokio::test]
  async fn test_unknown_kind_and_filter() {
    let tracker = tracker();
    let mut out = Vec::new();
    let err = run(parse(&["list", "zzz"]), &tracker, &mut out)
      .await
      .unwrap_err();
    assert!(err.to_string().contains("Unknown kind 'zzz'"));

    let err = run(parse(&["list", "notes", "--status", "applied"]), &tracker, &mut out)
      .await
      .unwrap_err();
    assert!(err.to_string().contains("--status does not apply to notes"));
  }

  #[tokio::test]
  async fn test_delete_then_show_missing() {
    let tracker = tracker();
    let created = exec(&tracker, &["add", "notes", "--data", r#"{"title":"Prep"}"#]).await;
    let id = serde_json::from_str::<Value>(&created).unwrap()["id"]
      .as_str()
      .unwrap()
      .to_string();

    assert_eq!(exec(&tracker, &["delete", "notes", id.as_str()]).await.trim(), format!("deleted notes {id}"));
    let mut out = Vec::new();
    assert!(run(parse(&["show", "notes", id.as_str()]), &tracker, &mut out).await.is_err());
  }
}
