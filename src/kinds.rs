//! Kind names accepted on the command line, and their resolution.

use crate::records::EntityKind;

#[derive(Debug, Clone)]
pub struct KindName {
  pub kind: EntityKind,
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All kinds, in dashboard order
pub const KINDS: &[KindName] = &[
  KindName {
    kind: EntityKind::Resume,
    name: "resumes",
    aliases: &["r", "resume", "cv"],
    description: "Resume variants by target stack",
  },
  KindName {
    kind: EntityKind::JobApplication,
    name: "applications",
    aliases: &["a", "apps", "application", "jobs"],
    description: "Job applications and their status",
  },
  KindName {
    kind: EntityKind::Document,
    name: "documents",
    aliases: &["d", "docs", "document"],
    description: "Identity and certification documents",
  },
  KindName {
    kind: EntityKind::Link,
    name: "links",
    aliases: &["l", "link", "bookmarks"],
    description: "Bookmarked job boards, profiles and tools",
  },
  KindName {
    kind: EntityKind::Contact,
    name: "contacts",
    aliases: &["c", "contact", "people", "references"],
    description: "Network contacts and references",
  },
  KindName {
    kind: EntityKind::RecruiterCall,
    name: "calls",
    aliases: &["call", "recruiter-calls"],
    description: "Recruiter calls and follow-ups",
  },
  KindName {
    kind: EntityKind::LearningItem,
    name: "learning",
    aliases: &["learn", "study"],
    description: "Learning tracker",
  },
  KindName {
    kind: EntityKind::Note,
    name: "notes",
    aliases: &["n", "note"],
    description: "Free-form notes",
  },
  KindName {
    kind: EntityKind::Todo,
    name: "todos",
    aliases: &["t", "todo", "tasks"],
    description: "Todo list",
  },
  KindName {
    kind: EntityKind::Project,
    name: "projects",
    aliases: &["p", "project", "portfolio"],
    description: "Portfolio projects",
  },
  KindName {
    kind: EntityKind::InterviewQuestion,
    name: "questions",
    aliases: &["q", "question", "iq", "interview-questions"],
    description: "Interview question bank",
  },
];

impl KindName {
  /// Table name with dashes, so `job_applications` and `job-applications`
  /// both resolve.
  fn table(&self) -> String {
    self.kind.table().replace('_', "-")
  }

  /// Match tier for `input`, lower is better: exact name or table, exact
  /// alias, name or table prefix, alias prefix, then substrings.
  fn rank(&self, input: &str) -> Option<usize> {
    let table = self.table();
    let names = [self.name, table.as_str()];

    let tiers = [
      names.contains(&input),
      self.aliases.contains(&input),
      names.iter().any(|n| n.starts_with(input)),
      self.aliases.iter().any(|a| a.starts_with(input)),
      names.iter().any(|n| n.contains(input)),
      self.aliases.iter().any(|a| a.contains(input)),
    ];
    tiers.iter().position(|&hit| hit)
  }
}

/// Lowercased, with spaces and underscores as dashes.
fn normalize(input: &str) -> String {
  input
    .trim()
    .to_lowercase()
    .replace(|c: char| c == '_' || c.is_whitespace(), "-")
}

/// Candidate kinds for `input`, best match first
pub fn suggestions(input: &str) -> Vec<&'static KindName> {
  let input = normalize(input);
  if input.is_empty() {
    return KINDS.iter().collect();
  }

  let mut ranked: Vec<(usize, &'static KindName)> = KINDS
    .iter()
    .filter_map(|entry| entry.rank(&input).map(|tier| (tier, entry)))
    .collect();
  ranked.sort_by_key(|(tier, _)| *tier);
  ranked.into_iter().map(|(_, entry)| entry).collect()
}

/// The best matching kind, if any
pub fn resolve(input: &str) -> Option<EntityKind> {
  suggestions(input).first().map(|entry| entry.kind)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    assert_eq!(suggestions("").len(), KINDS.len());
  }

  #[test]
  fn test_every_kind_listed_once() {
    for kind in EntityKind::ALL {
      assert_eq!(KINDS.iter().filter(|k| k.kind == kind).count(), 1);
    }
  }

  #[test]
  fn test_exact_match() {
    assert_eq!(resolve("todos"), Some(EntityKind::Todo));
    assert_eq!(resolve("Calls"), Some(EntityKind::RecruiterCall));
  }

  #[test]
  fn test_alias_match() {
    assert_eq!(resolve("q"), Some(EntityKind::InterviewQuestion));
    assert_eq!(resolve("cv"), Some(EntityKind::Resume));
  }

  #[test]
  fn test_prefix_match() {
    assert_eq!(resolve("app"), Some(EntityKind::JobApplication));
    assert_eq!(resolve("lea"), Some(EntityKind::LearningItem));
  }

  #[test]
  fn test_fuzzy_match() {
    assert_eq!(resolve("estio"), Some(EntityKind::InterviewQuestion));
    assert_eq!(resolve("arni"), Some(EntityKind::LearningItem));
  }

  #[test]
  fn test_no_match() {
    assert_eq!(resolve("zzz"), None);
  }

  #[test]
  fn test_table_names_resolve() {
    assert_eq!(resolve("job_applications"), Some(EntityKind::JobApplication));
    assert_eq!(resolve("recruiter_calls"), Some(EntityKind::RecruiterCall));
    assert_eq!(resolve("Interview Questions"), Some(EntityKind::InterviewQuestion));
    assert_eq!(resolve("learning-items"), Some(EntityKind::LearningItem));
  }
}
