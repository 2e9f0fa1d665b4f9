//! The `ProfileApi` trait: the remote API as seen by the client.
//!
//! Implemented over HTTP by `packs-client` and by in-memory fakes in tests.
//! The state container (`packs-store`) and the CLI depend on this
//! abstraction, not on any transport.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  draft::FormPart,
  profile::{Classification, CreatorProfile, ProfileRecord, SavedProfile},
  submission::Submission,
  user::{UserStatus, UserSummary},
};

/// Body of `PUT /api/profile/update_genres_types`: the complete replacement
/// id sets. An empty list leaves that field unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationUpdate {
  #[serde(default)]
  pub genres: Vec<i64>,
  #[serde(default)]
  pub types:  Vec<i64>,
}

impl ClassificationUpdate {
  /// Apply this update to `creator` given the server's `reply`.
  ///
  /// Only the fields this update replaces change. The reply may carry full
  /// entries, bare ids, or omit a field; each id takes its name from the
  /// reply, then from `creator`'s current entries, else stays blank.
  pub fn merge_into(
    &self,
    creator: &mut CreatorProfile,
    reply: &CreatorProfile,
  ) {
    merge_field(&mut creator.genres, &self.genres, &reply.genres);
    merge_field(&mut creator.types, &self.types, &reply.types);
  }
}

fn merge_field(
  current: &mut Vec<Classification>,
  ids: &[i64],
  echoed: &[Classification],
) {
  if ids.is_empty() {
    return;
  }
  let name_of = |id: i64| {
    echoed
      .iter()
      .chain(current.iter())
      .find(|entry| entry.id == id && !entry.name.is_empty())
      .map(|entry| entry.name.clone())
      .unwrap_or_default()
  };
  let merged: Vec<_> = ids
    .iter()
    .map(|&id| Classification { id, name: name_of(id) })
    .collect();
  *current = merged;
}

/// Abstraction over the remote profile API.
///
/// Every call relies on a session the implementation already holds. None of
/// them retries; a failure is returned to the caller as-is.
pub trait ProfileApi: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Owned by the profile store ────────────────────────────────────────

  /// `GET` the signed-in account's profile snapshot.
  fn fetch_profile(
    &self,
  ) -> impl Future<Output = Result<ProfileRecord, Self::Error>> + Send + '_;

  /// Write a multipart profile form and return the server's confirmation.
  fn update_profile(
    &self,
    parts: Vec<FormPart>,
  ) -> impl Future<Output = Result<SavedProfile, Self::Error>> + Send + '_;

  /// Replace the creator's genre and type sets by id.
  fn update_classifications(
    &self,
    update: ClassificationUpdate,
  ) -> impl Future<Output = Result<CreatorProfile, Self::Error>> + Send + '_;

  // ── Consumed directly by views ────────────────────────────────────────

  /// The signed-in creator's submissions, in server order.
  fn list_user_submissions(
    &self,
  ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<UserSummary, Self::Error>> + Send + '_;

  /// Administrative status change; the server rejects non-company callers.
  fn update_user_status(
    &self,
    user_id: i64,
    status: UserStatus,
  ) -> impl Future<Output = Result<UserSummary, Self::Error>> + Send + '_;
}
