//! Load lifecycle of the profile record.
//!
//! ```text
//! Uninitialized ──fetch──▶ Loading ──ok──▶ Loaded ◀──update ok──┐
//!                             │                 └───────────────┘
//!                             ├──err──▶ Error { previous }
//!                             └──abandoned──▶ previous state
//! ```
//!
//! A failed fetch never loses data: `Loading` and `Error` both carry the
//! record that was loaded before, if any.

use crate::profile::ProfileRecord;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
  /// Nothing fetched in this session.
  #[default]
  Uninitialized,
  /// A fetch is outstanding.
  Loading { previous: Option<ProfileRecord> },
  Loaded(ProfileRecord),
  /// The last fetch failed.
  Error {
    message:  String,
    previous: Option<ProfileRecord>,
  },
}

impl LoadState {
  /// The best record available in this state: the loaded one, or the one
  /// kept across a refetch or failure.
  pub fn record(&self) -> Option<&ProfileRecord> {
    match self {
      Self::Uninitialized => None,
      Self::Loaded(record) => Some(record),
      Self::Loading { previous } | Self::Error { previous, .. } => {
        previous.as_ref()
      }
    }
  }

  pub fn is_loading(&self) -> bool { matches!(self, Self::Loading { .. }) }

  pub fn is_loaded(&self) -> bool { matches!(self, Self::Loaded(_)) }

  pub fn error(&self) -> Option<&str> {
    match self {
      Self::Error { message, .. } => Some(message.as_str()),
      _ => None,
    }
  }

  /// Transition for an issued fetch.
  pub fn begin_loading(self) -> Self {
    Self::Loading {
      previous: self.into_record(),
    }
  }

  /// Transition for a failed fetch; the previous record is kept.
  pub fn fail(self, message: impl Into<String>) -> Self {
    Self::Error {
      message:  message.into(),
      previous: self.into_record(),
    }
  }

  /// Transition for a fetch whose caller stopped waiting: `Loading` falls
  /// back to the record it carried, every other state is kept.
  pub fn abandon(self) -> Self {
    match self {
      Self::Loading { previous: Some(record) } => Self::Loaded(record),
      Self::Loading { previous: None } => Self::Uninitialized,
      other => other,
    }
  }

  fn into_record(self) -> Option<ProfileRecord> {
    match self {
      Self::Uninitialized => None,
      Self::Loaded(record) => Some(record),
      Self::Loading { previous } | Self::Error { previous, .. } => previous,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::profile::{CompanyProfile, ProfileSubject};

  fn record() -> ProfileRecord {
    ProfileRecord {
      id:       1,
      username: "north".into(),
      email:    "hi@north.example".into(),
      subject:  ProfileSubject::Company(CompanyProfile::default()),
    }
  }

  #[test]
  fn failure_from_uninitialized_has_no_previous() {
    let state = LoadState::Uninitialized.begin_loading().fail("boom");
    assert_eq!(state, LoadState::Error {
      message:  "boom".into(),
      previous: None,
    });
    assert_eq!(state.error(), Some("boom"));
    assert!(state.record().is_none());
  }

  #[test]
  fn failure_after_load_keeps_the_record() {
    let loading = LoadState::Loaded(record()).begin_loading();
    assert!(loading.is_loading());
    assert_eq!(loading.record(), Some(&record()));

    let failed = loading.fail("timeout");
    assert_eq!(failed.record(), Some(&record()));
    assert!(!failed.is_loaded());
  }

  #[test]
  fn refetch_after_error_carries_the_record_forward() {
    let state = LoadState::Loaded(record())
      .begin_loading()
      .fail("timeout")
      .begin_loading();
    assert_eq!(state, LoadState::Loading {
      previous: Some(record()),
    });
  }

  #[test]
  fn abandoned_fetch_falls_back() {
    let state = LoadState::Loaded(record()).begin_loading().abandon();
    assert_eq!(state, LoadState::Loaded(record()));

    let state = LoadState::Uninitialized.begin_loading().abandon();
    assert_eq!(state, LoadState::Uninitialized);

    let failed = LoadState::Uninitialized.fail("boom");
    assert_eq!(failed.clone().abandon(), failed);
  }
}
