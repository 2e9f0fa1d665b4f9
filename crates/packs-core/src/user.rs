//! Account-level data: the application status ladder and the user summary
//! served to the administrative view.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result, de, profile::CreatorProfile, subject::SubjectType};

/// Where an account stands in the application/subscription process.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
pub enum UserStatus {
  #[default]
  #[serde(rename = "Pre-Apply")]
  #[strum(serialize = "Pre-Apply")]
  PreApply,
  Applied,
  Accepted,
  Denied,
  #[serde(rename = "Premium Monthly")]
  #[strum(serialize = "Premium Monthly")]
  PremiumMonthly,
  #[serde(rename = "Premium Annual")]
  #[strum(serialize = "Premium Annual")]
  PremiumAnnual,
}

impl UserStatus {
  /// Parse the server spelling, mapping failures into [`Error`].
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownStatus(s.to_owned()))
  }

  /// The account has not applied yet and must do so before submitting.
  pub fn needs_application(self) -> bool { self == Self::PreApply }

  /// Accepted and premium accounts get the subscription panel.
  pub fn has_subscription(self) -> bool {
    matches!(
      self,
      Self::Accepted | Self::PremiumMonthly | Self::PremiumAnnual
    )
  }
}

/// Body of `PUT /api/users/<id>/status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusChange {
  pub status: UserStatus,
}

/// A user as returned by `GET /api/users/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub id:       i64,
  #[serde(default, deserialize_with = "de::text")]
  pub username: String,
  #[serde(default, deserialize_with = "de::text")]
  pub email:    String,
  #[serde(default)]
  pub status:   UserStatus,
  #[serde(rename = "type")]
  pub subject:  SubjectType,
  /// Present when the account has a creator profile.
  #[serde(
    default,
    deserialize_with = "de::object_or_none",
    skip_serializing_if = "Option::is_none"
  )]
  pub creator:  Option<CreatorProfile>,
}
