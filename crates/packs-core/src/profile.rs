//! The extended profile of the signed-in account.
//!
//! The server sends one object per account with a `type` tag and at most one
//! populated sub-object (`creator` or `company`). [`ProfileRecord`] folds that
//! into a single enum so exactly one variant's fields can exist at a time.
//! Every optional text field is a plain `String`: absent and `null` values
//! arrive as `""`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{de, subject::SubjectType};

// ─── Classification ──────────────────────────────────────────────────────────

/// One tagged entry of a multi-valued classification field (a genre or a
/// type).
///
/// Some write endpoints echo only the ids; a bare id decodes with an empty
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ClassificationWire")]
pub struct Classification {
  pub id:   i64,
  pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationWire {
  Entry {
    id:   i64,
    #[serde(default, deserialize_with = "de::text")]
    name: String,
  },
  Id(i64),
}

impl From<ClassificationWire> for Classification {
  fn from(wire: ClassificationWire) -> Self {
    match wire {
      ClassificationWire::Entry { id, name } => Self { id, name },
      ClassificationWire::Id(id) => Self {
        id,
        name: String::new(),
      },
    }
  }
}

// ─── Creator ─────────────────────────────────────────────────────────────────

/// Handles on the fixed set of supported platforms plus a free-text "other".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialHandles {
  #[serde(default, deserialize_with = "de::text")]
  pub instagram:          String,
  #[serde(default, deserialize_with = "de::text")]
  pub twitter:            String,
  #[serde(default, deserialize_with = "de::text")]
  pub facebook:           String,
  #[serde(default, deserialize_with = "de::text")]
  pub youtube:            String,
  #[serde(default, deserialize_with = "de::text")]
  pub other_social_media: String,
}

/// The professional reference a creator lists on their application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceContact {
  #[serde(default, deserialize_with = "de::text")]
  pub reference_name:         String,
  #[serde(default, deserialize_with = "de::text")]
  pub reference_email:        String,
  #[serde(default, deserialize_with = "de::text")]
  pub reference_phone:        String,
  #[serde(default, deserialize_with = "de::text")]
  pub reference_relationship: String,
}

/// Form keys of every free-text creator field, in display order.
pub const CREATOR_TEXT_FIELDS: &[&str] = &[
  "first_name",
  "last_name",
  "stage_name",
  "bio",
  "phone",
  "address_1",
  "address_2",
  "city",
  "state",
  "postal_code",
  "portfolio_url",
  "previous_projects",
  "instagram",
  "twitter",
  "facebook",
  "youtube",
  "other_social_media",
  "reference_name",
  "reference_email",
  "reference_phone",
  "reference_relationship",
];

/// Form keys of the creator's classification fields.
pub const CLASSIFICATION_FIELDS: &[&str] = &["genres", "types"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorProfile {
  #[serde(default, deserialize_with = "de::text")]
  pub first_name:        String,
  #[serde(default, deserialize_with = "de::text")]
  pub last_name:         String,
  #[serde(default, deserialize_with = "de::text")]
  pub stage_name:        String,
  #[serde(default, deserialize_with = "de::text")]
  pub bio:               String,
  /// Storage URL of the uploaded picture; assigned by the server.
  #[serde(default, deserialize_with = "de::text")]
  pub profile_pic:       String,
  #[serde(default, deserialize_with = "de::text")]
  pub phone:             String,
  #[serde(default, deserialize_with = "de::text")]
  pub address_1:         String,
  #[serde(default, deserialize_with = "de::text")]
  pub address_2:         String,
  #[serde(default, deserialize_with = "de::text")]
  pub city:              String,
  #[serde(default, deserialize_with = "de::text")]
  pub state:             String,
  #[serde(default, deserialize_with = "de::text")]
  pub postal_code:       String,
  #[serde(default, deserialize_with = "de::text")]
  pub portfolio_url:     String,
  #[serde(default, deserialize_with = "de::text")]
  pub previous_projects: String,
  #[serde(flatten)]
  pub social:            SocialHandles,
  #[serde(flatten)]
  pub reference:         ReferenceContact,
  #[serde(default, deserialize_with = "de::list")]
  pub genres:            Vec<Classification>,
  #[serde(default, deserialize_with = "de::list")]
  pub types:             Vec<Classification>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_date:      Option<NaiveDateTime>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_date:      Option<NaiveDateTime>,
}

impl CreatorProfile {
  /// The free-text field behind form key `key`, if there is one.
  pub fn text_field(&self, key: &str) -> Option<&str> {
    let value = match key {
      "first_name" => &self.first_name,
      "last_name" => &self.last_name,
      "stage_name" => &self.stage_name,
      "bio" => &self.bio,
      "phone" => &self.phone,
      "address_1" => &self.address_1,
      "address_2" => &self.address_2,
      "city" => &self.city,
      "state" => &self.state,
      "postal_code" => &self.postal_code,
      "portfolio_url" => &self.portfolio_url,
      "previous_projects" => &self.previous_projects,
      "instagram" => &self.social.instagram,
      "twitter" => &self.social.twitter,
      "facebook" => &self.social.facebook,
      "youtube" => &self.social.youtube,
      "other_social_media" => &self.social.other_social_media,
      "reference_name" => &self.reference.reference_name,
      "reference_email" => &self.reference.reference_email,
      "reference_phone" => &self.reference.reference_phone,
      "reference_relationship" => &self.reference.reference_relationship,
      _ => return None,
    };
    Some(value)
  }

  /// Mutable access to the free-text field behind form key `key`.
  pub fn text_field_mut(&mut self, key: &str) -> Option<&mut String> {
    let value = match key {
      "first_name" => &mut self.first_name,
      "last_name" => &mut self.last_name,
      "stage_name" => &mut self.stage_name,
      "bio" => &mut self.bio,
      "phone" => &mut self.phone,
      "address_1" => &mut self.address_1,
      "address_2" => &mut self.address_2,
      "city" => &mut self.city,
      "state" => &mut self.state,
      "postal_code" => &mut self.postal_code,
      "portfolio_url" => &mut self.portfolio_url,
      "previous_projects" => &mut self.previous_projects,
      "instagram" => &mut self.social.instagram,
      "twitter" => &mut self.social.twitter,
      "facebook" => &mut self.social.facebook,
      "youtube" => &mut self.social.youtube,
      "other_social_media" => &mut self.social.other_social_media,
      "reference_name" => &mut self.reference.reference_name,
      "reference_email" => &mut self.reference.reference_email,
      "reference_phone" => &mut self.reference.reference_phone,
      "reference_relationship" => &mut self.reference.reference_relationship,
      _ => return None,
    };
    Some(value)
  }

  /// `(key, value)` for every free-text field, in [`CREATOR_TEXT_FIELDS`]
  /// order.
  pub fn text_fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
    CREATOR_TEXT_FIELDS
      .iter()
      .filter_map(|key| self.text_field(key).map(|value| (*key, value)))
  }

  /// One-line postal address; blank parts are skipped.
  pub fn address_line(&self) -> String {
    let street = [self.address_1.as_str(), self.address_2.as_str()]
      .into_iter()
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(" ");
    let region = [self.state.as_str(), self.postal_code.as_str()]
      .into_iter()
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(" ");
    [street.as_str(), self.city.as_str(), region.as_str()]
      .into_iter()
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(", ")
  }
}

// ─── Company ─────────────────────────────────────────────────────────────────

/// Form keys of every free-text company field.
pub const COMPANY_TEXT_FIELDS: &[&str] = &["name", "bio"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
  #[serde(default, deserialize_with = "de::text")]
  pub name:         String,
  #[serde(default, deserialize_with = "de::text")]
  pub bio:          String,
  /// Storage URL of the uploaded logo; assigned by the server.
  #[serde(default, deserialize_with = "de::text")]
  pub logo:         String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_date: Option<NaiveDateTime>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_date: Option<NaiveDateTime>,
}

impl CompanyProfile {
  pub fn text_field_mut(&mut self, key: &str) -> Option<&mut String> {
    match key {
      "name" => Some(&mut self.name),
      "bio" => Some(&mut self.bio),
      _ => None,
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// The subject-specific half of a profile. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSubject {
  Creator(CreatorProfile),
  Company(CompanyProfile),
  /// A subject type this client has no schema for; only the tag is kept.
  Other(String),
}

/// The single authoritative copy of an account's extended profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProfileSnapshot", into = "ProfileSnapshot")]
pub struct ProfileRecord {
  pub id:       i64,
  pub username: String,
  pub email:    String,
  pub subject:  ProfileSubject,
}

impl ProfileRecord {
  pub fn subject_type(&self) -> SubjectType {
    match &self.subject {
      ProfileSubject::Creator(_) => SubjectType::Creator,
      ProfileSubject::Company(_) => SubjectType::Company,
      ProfileSubject::Other(tag) => SubjectType::from(tag.clone()),
    }
  }

  pub fn creator(&self) -> Option<&CreatorProfile> {
    match &self.subject {
      ProfileSubject::Creator(c) => Some(c),
      _ => None,
    }
  }

  pub fn creator_mut(&mut self) -> Option<&mut CreatorProfile> {
    match &mut self.subject {
      ProfileSubject::Creator(c) => Some(c),
      _ => None,
    }
  }

  pub fn company(&self) -> Option<&CompanyProfile> {
    match &self.subject {
      ProfileSubject::Company(c) => Some(c),
      _ => None,
    }
  }

  /// The name shown in page headers: stage name, then full name, then company
  /// name, then the account username.
  pub fn display_name(&self) -> String {
    let candidate = match &self.subject {
      ProfileSubject::Creator(c) if !c.stage_name.is_empty() => {
        c.stage_name.clone()
      }
      ProfileSubject::Creator(c) => {
        format!("{} {}", c.first_name, c.last_name).trim().to_owned()
      }
      ProfileSubject::Company(c) => c.name.clone(),
      ProfileSubject::Other(_) => String::new(),
    };
    if candidate.is_empty() {
      self.username.clone()
    } else {
      candidate
    }
  }
}

/// The server's answer to a profile write.
///
/// The write endpoint may echo just the account envelope without the
/// `creator`/`company` object; `subject` is `None` then.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ProfileSnapshot")]
pub struct SavedProfile {
  pub id:           i64,
  pub username:     String,
  pub email:        String,
  pub subject_type: SubjectType,
  pub subject:      Option<ProfileSubject>,
}

impl SavedProfile {
  /// The record after this write. Without an echoed subject, the subject of
  /// `current` is kept when it has the same type; otherwise the subject
  /// loads empty.
  pub fn into_record(self, current: Option<&ProfileRecord>) -> ProfileRecord {
    let subject = match self.subject {
      Some(subject) => subject,
      None => match current {
        Some(current) if current.subject_type() == self.subject_type => {
          current.subject.clone()
        }
        _ => empty_subject(self.subject_type),
      },
    };
    ProfileRecord {
      id: self.id,
      username: self.username,
      email: self.email,
      subject,
    }
  }
}

impl From<ProfileRecord> for SavedProfile {
  fn from(record: ProfileRecord) -> Self {
    let subject_type = record.subject_type();
    Self {
      id: record.id,
      username: record.username,
      email: record.email,
      subject_type,
      subject: Some(record.subject),
    }
  }
}

impl From<ProfileSnapshot> for SavedProfile {
  fn from(snapshot: ProfileSnapshot) -> Self {
    // Only the sub-object matching the tag is kept.
    let subject = match &snapshot.subject_type {
      SubjectType::Creator => snapshot.creator.map(ProfileSubject::Creator),
      SubjectType::Company => snapshot.company.map(ProfileSubject::Company),
      SubjectType::Other(tag) => Some(ProfileSubject::Other(tag.clone())),
    };
    Self {
      id: snapshot.id,
      username: snapshot.username,
      email: snapshot.email,
      subject_type: snapshot.subject_type,
      subject,
    }
  }
}

/// A missing subject row loads as an empty profile of the tagged type.
fn empty_subject(subject_type: SubjectType) -> ProfileSubject {
  match subject_type {
    SubjectType::Creator => ProfileSubject::Creator(CreatorProfile::default()),
    SubjectType::Company => ProfileSubject::Company(CompanyProfile::default()),
    SubjectType::Other(tag) => ProfileSubject::Other(tag),
  }
}

/// Wire shape of `GET /api/profile/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileSnapshot {
  #[serde(default)]
  id:           i64,
  #[serde(default, deserialize_with = "de::text")]
  username:     String,
  #[serde(default, deserialize_with = "de::text")]
  email:        String,
  #[serde(rename = "type")]
  subject_type: SubjectType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  creator:      Option<CreatorProfile>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  company:      Option<CompanyProfile>,
}

impl From<ProfileSnapshot> for ProfileRecord {
  fn from(snapshot: ProfileSnapshot) -> Self {
    SavedProfile::from(snapshot).into_record(None)
  }
}

impl From<ProfileRecord> for ProfileSnapshot {
  fn from(record: ProfileRecord) -> Self {
    let subject_type = record.subject_type();
    let (creator, company) = match record.subject {
      ProfileSubject::Creator(c) => (Some(c), None),
      ProfileSubject::Company(c) => (None, Some(c)),
      ProfileSubject::Other(_) => (None, None),
    };
    Self {
      id: record.id,
      username: record.username,
      email: record.email,
      subject_type,
      creator,
      company,
    }
  }
}
