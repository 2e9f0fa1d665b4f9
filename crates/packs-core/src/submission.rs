//! Tracks a creator has sent to opportunities.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::de;

/// One row of `GET /api/opportunities/submissions/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
  pub id:               i64,
  #[serde(default, deserialize_with = "de::text")]
  pub name:             String,
  pub opportunity_id:   i64,
  #[serde(default, deserialize_with = "de::text")]
  pub opportunity_name: String,
  #[serde(default, deserialize_with = "de::text")]
  pub status:           String,
  #[serde(default, deserialize_with = "de::text")]
  pub notes:            String,
  /// Tempo as entered by the creator; free text on the server.
  #[serde(default, deserialize_with = "de::text")]
  pub bpm:              String,
  #[serde(default, deserialize_with = "de::text")]
  pub collaborators:    String,
  #[serde(default)]
  pub created_date:     Option<NaiveDateTime>,
}

impl Submission {
  /// Notes cut to `max_chars` characters with an ellipsis marker.
  pub fn notes_preview(&self, max_chars: usize) -> String {
    if self.notes.chars().count() <= max_chars {
      return self.notes.clone();
    }
    let cut: String = self.notes.chars().take(max_chars).collect();
    format!("{cut} ...")
  }
}
