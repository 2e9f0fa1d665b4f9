//! Which profile schema variant applies to an account, and
//! the access predicate evaluated against it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The tag distinguishing which profile schema variant applies.
///
/// Serialised as the bare server string (`"Creator"`, `"Company"`); any other
/// tag is preserved verbatim in [`SubjectType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubjectType {
  Creator,
  Company,
  Other(String),
}

impl SubjectType {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Creator => "Creator",
      Self::Company => "Company",
      Self::Other(tag) => tag,
    }
  }
}

impl From<String> for SubjectType {
  fn from(tag: String) -> Self {
    match tag.as_str() {
      "Creator" => Self::Creator,
      "Company" => Self::Company,
      _ => Self::Other(tag),
    }
  }
}

impl From<SubjectType> for String {
  fn from(subject: SubjectType) -> Self {
    match subject {
      SubjectType::Other(tag) => tag,
      known => known.as_str().to_owned(),
    }
  }
}

impl fmt::Display for SubjectType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Access ──────────────────────────────────────────────────────────────────

/// Who may open a guarded view. Evaluated by the composition layer before the
/// view runs; views themselves never check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
  #[default]
  Anyone,
  CreatorOnly,
  CompanyOnly,
}

impl Access {
  pub fn permits(self, subject: &SubjectType) -> bool {
    match self {
      Self::Anyone => true,
      Self::CreatorOnly => *subject == SubjectType::Creator,
      Self::CompanyOnly => *subject == SubjectType::Company,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_tags_survive_a_round_trip() {
    let subject: SubjectType = serde_json::from_str(r#""Moderator""#).unwrap();
    assert_eq!(subject, SubjectType::Other("Moderator".into()));
    assert_eq!(serde_json::to_string(&subject).unwrap(), r#""Moderator""#);
  }

  #[test]
  fn company_only_rejects_creators() {
    assert!(Access::CompanyOnly.permits(&SubjectType::Company));
    assert!(!Access::CompanyOnly.permits(&SubjectType::Creator));
    assert!(!Access::CreatorOnly.permits(&SubjectType::Other("Admin".into())));
    assert!(Access::Anyone.permits(&SubjectType::Other("Admin".into())));
  }
}
