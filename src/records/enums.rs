//! Closed enumerations stored as kebab-case text columns.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
  pub kind: &'static str,
  pub value: String,
}

macro_rules! string_enum {
  (
    $(#[$meta:meta])*
    $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum $name {
      $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
    }

    impl $name {
      pub const ALL: &'static [$name] = &[$($name::$variant),+];

      pub fn as_str(self) -> &'static str {
        match self {
          $($name::$variant => $text),+
        }
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl FromStr for $name {
      type Err = UnknownVariant;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
          $($text => Ok($name::$variant),)+
          _ => Err(UnknownVariant {
            kind: stringify!($name),
            value: s.to_string(),
          }),
        }
      }
    }

    impl From<$name> for Value {
      fn from(v: $name) -> Self {
        Value::String(v.as_str().to_string())
      }
    }
  };
}

string_enum!(
  /// Which tailored resume variant a file is.
  ResumeType {
    JavaAngularAws => "java-angular-aws",
    JavaReactAws => "java-react-aws",
    PureFrontend => "pure-frontend",
    QaAutomation => "qa-automation",
    DotnetReactAws => "dotnet-react-aws",
    DotnetAngularAws => "dotnet-angular-aws",
    AiMl => "ai-ml",
  }
);

string_enum!(
  #[derive(Default)]
  ApplicationStatus {
    #[default]
    Applied => "applied",
    InterviewScheduled => "interview-scheduled",
    Interviewed => "interviewed",
    Offer => "offer",
    Rejected => "rejected",
    NoResponse => "no-response",
  }
);

string_enum!(DocumentType {
  DrivingLicense => "driving-license",
  Ead => "ead",
  StemEad => "stem-ead",
  AwsCertificate => "aws-certificate",
  LinkedinCertificate => "linkedin-certificate",
  Other => "other",
});

string_enum!(LinkCategory {
  JobBoard => "job-board",
  Portfolio => "portfolio",
  Github => "github",
  Linkedin => "linkedin",
  Certification => "certification",
  Learning => "learning",
  Tool => "tool",
  Other => "other",
});

string_enum!(LearningCategory {
  Java => "java",
  React => "react",
  Angular => "angular",
  Aws => "aws",
  SpringBoot => "spring-boot",
  Python => "python",
  SystemDesign => "system-design",
  Leetcode => "leetcode",
  Behavioral => "behavioral",
  Other => "other",
});

string_enum!(
  #[derive(Default)]
  LearningStatus {
    #[default]
    NotStarted => "not-started",
    InProgress => "in-progress",
    Completed => "completed",
  }
);

string_enum!(
  /// Follow-up state of a recruiter call. Kept in step with
  /// `follow_up_happened` by whoever edits the call.
  #[derive(Default)]
  CallStatus {
    #[default]
    Pending => "pending",
    FollowedUp => "followed-up",
    NoFollowUp => "no-follow-up",
  }
);

impl CallStatus {
  /// Status a caller should write alongside a follow-up toggle.
  pub fn for_follow_up(happened: bool) -> Self {
    if happened {
      CallStatus::FollowedUp
    } else {
      CallStatus::Pending
    }
  }
}

string_enum!(
  #[derive(Default)]
  Priority {
    Low => "low",
    #[default]
    Medium => "medium",
    High => "high",
  }
);

impl Priority {
  /// Higher is more urgent.
  pub fn rank(self) -> u8 {
    match self {
      Priority::Low => 1,
      Priority::Medium => 2,
      Priority::High => 3,
    }
  }
}

string_enum!(
  #[derive(Default)]
  QuestionCategory {
    Behavioral => "behavioral",
    #[default]
    Technical => "technical",
  }
);

string_enum!(
  #[derive(Default)]
  InterviewTechnology {
    #[default]
    Java => "java",
    React => "react",
    Angular => "angular",
    Aws => "aws",
    SpringBoot => "spring-boot",
    Python => "python",
    Javascript => "javascript",
    Typescript => "typescript",
    Nodejs => "nodejs",
    Sql => "sql",
    SystemDesign => "system-design",
    DataStructures => "data-structures",
    Algorithms => "algorithms",
    Leetcode => "leetcode",
    Behavioral => "behavioral",
    HtmlCss => "html-css",
    Docker => "docker",
    Kubernetes => "kubernetes",
    Microservices => "microservices",
    Other => "other",
  }
);

string_enum!(
  #[derive(Default)]
  Difficulty {
    Easy => "easy",
    #[default]
    Medium => "medium",
    Hard => "hard",
  }
);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_serde_uses_stored_text() {
    let status: ApplicationStatus = serde_json::from_str("\"interview-scheduled\"").unwrap();
    assert_eq!(status, ApplicationStatus::InterviewScheduled);
    assert_eq!(
      serde_json::to_string(&ResumeType::DotnetAngularAws).unwrap(),
      "\"dotnet-angular-aws\""
    );
  }

  #[test]
  fn test_from_str_matches_as_str() {
    for tech in InterviewTechnology::ALL {
      assert_eq!(tech.as_str().parse::<InterviewTechnology>(), Ok(*tech));
    }
  }

  #[test]
  fn test_unknown_variant() {
    let err = "maybe".parse::<CallStatus>().unwrap_err();
    assert_eq!(err.kind, "CallStatus");
    assert_eq!(err.to_string(), "unknown CallStatus 'maybe'");
  }

  #[test]
  fn test_follow_up_convention() {
    assert_eq!(CallStatus::for_follow_up(true), CallStatus::FollowedUp);
    assert_eq!(CallStatus::for_follow_up(false), CallStatus::Pending);
  }

  #[test]
  fn test_priority_rank_orders_by_urgency() {
    assert!(Priority::High.rank() > Priority::Medium.rank());
    assert!(Priority::Medium.rank() > Priority::Low.rank());
    assert_eq!(Priority::default(), Priority::Medium);
  }

  #[test]
  fn test_defaults_match_stored_defaults() {
    assert_eq!(ApplicationStatus::default().as_str(), "applied");
    assert_eq!(LearningStatus::default().as_str(), "not-started");
    assert_eq!(CallStatus::default().as_str(), "pending");
    assert_eq!(QuestionCategory::default().as_str(), "technical");
    assert_eq!(InterviewTechnology::default().as_str(), "java");
    assert_eq!(Difficulty::default().as_str(), "medium");
  }
}
