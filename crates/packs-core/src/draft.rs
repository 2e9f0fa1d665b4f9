//! Local edit buffer for the profile form and its multipart encoding.
//!
//! A [`ProfileDraft`] is owned by the caller, never by the store. Saving
//! borrows it, so a failed save leaves every edit in place for a retry.

use std::path::Path;

use crate::{
  Error, Result,
  profile::{
    CLASSIFICATION_FIELDS, COMPANY_TEXT_FIELDS, CREATOR_TEXT_FIELDS,
    Classification, ProfileRecord, ProfileSubject,
  },
  subject::SubjectType,
};

/// Largest upload the server accepts for a profile picture or logo.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
  ("jpg", "image/jpeg"),
  ("jpeg", "image/jpeg"),
  ("png", "image/png"),
  ("gif", "image/gif"),
];

// ─── Values ──────────────────────────────────────────────────────────────────

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
  pub file_name:    String,
  pub content_type: String,
  pub bytes:        Vec<u8>,
}

impl FileUpload {
  /// Validate an image upload the way the server will: extension must be
  /// jpg/jpeg/png/gif and the size at most [`MAX_UPLOAD_BYTES`].
  pub fn image(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
    let file_name = file_name.into();
    let extension = Path::new(&file_name)
      .extension()
      .and_then(|e| e.to_str())
      .map(str::to_ascii_lowercase)
      .unwrap_or_default();
    let content_type = IMAGE_EXTENSIONS
      .iter()
      .find(|(ext, _)| *ext == extension)
      .map(|(_, mime)| (*mime).to_owned())
      .ok_or_else(|| Error::UnsupportedImage {
        file_name: file_name.clone(),
      })?;
    if bytes.len() > MAX_UPLOAD_BYTES {
      return Err(Error::FileTooLarge {
        file_name,
        size: bytes.len(),
        limit: MAX_UPLOAD_BYTES,
      });
    }
    Ok(Self {
      file_name,
      content_type,
      bytes,
    })
  }
}

/// The current local value of one form key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftValue {
  Text(String),
  /// A classification field; one form part per element.
  List(Vec<String>),
  File(FileUpload),
  /// Intentionally unset; omitted from the payload entirely.
  Null,
}

/// One entry of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
  Text { name: String, value: String },
  File { name: String, upload: FileUpload },
}

impl FormPart {
  pub fn name(&self) -> &str {
    match self {
      Self::Text { name, .. } | Self::File { name, .. } => name,
    }
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Ordered key/value edit buffer for one subject type's profile form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
  subject: SubjectType,
  fields:  Vec<(String, DraftValue)>,
}

impl ProfileDraft {
  /// An empty draft. Every key starts out [`DraftValue::Null`].
  pub fn new(subject: SubjectType) -> Self {
    Self {
      subject,
      fields: Vec::new(),
    }
  }

  /// Seed a draft from a loaded record: every text field, the classification
  /// ids, and `Null` for file fields so nothing is re-uploaded by accident.
  pub fn from_record(record: &ProfileRecord) -> Self {
    let mut draft = Self::new(record.subject_type());
    match &record.subject {
      ProfileSubject::Creator(creator) => {
        for (key, value) in creator.text_fields() {
          draft.put(key, DraftValue::Text(value.to_owned()));
        }
        draft.put("profile_pic", DraftValue::Null);
        let ids = |entries: &[Classification]| -> Vec<String> {
          entries.iter().map(|c| c.id.to_string()).collect()
        };
        draft.put("genres", DraftValue::List(ids(&creator.genres)));
        draft.put("types", DraftValue::List(ids(&creator.types)));
      }
      ProfileSubject::Company(company) => {
        draft.put("name", DraftValue::Text(company.name.clone()));
        draft.put("bio", DraftValue::Text(company.bio.clone()));
        draft.put("logo", DraftValue::Null);
      }
      ProfileSubject::Other(_) => {}
    }
    draft
  }

  pub fn subject(&self) -> &SubjectType { &self.subject }

  pub fn get(&self, key: &str) -> Option<&DraftValue> {
    self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
  }

  /// The text value of `key`, or `""` when unset.
  pub fn text(&self, key: &str) -> &str {
    match self.get(key) {
      Some(DraftValue::Text(s)) => s.as_str(),
      _ => "",
    }
  }

  /// The entries of a classification field; a non-list value reads as empty.
  pub fn list(&self, key: &str) -> &[String] {
    match self.get(key) {
      Some(DraftValue::List(values)) => values.as_slice(),
      _ => &[],
    }
  }

  /// Set a free-text field. Fails for keys the subject's form doesn't have.
  pub fn set_text(
    &mut self,
    key: &str,
    value: impl Into<String>,
  ) -> Result<()> {
    self.ensure_field(key, self.text_keys())?;
    self.put(key, DraftValue::Text(value.into()));
    Ok(())
  }

  /// Attach a file to the subject's upload field (`profile_pic` or `logo`).
  pub fn set_file(&mut self, key: &str, upload: FileUpload) -> Result<()> {
    self.ensure_field(key, self.file_keys())?;
    self.put(key, DraftValue::File(upload));
    Ok(())
  }

  /// Mark `key` as intentionally unset so it is left out of the payload.
  pub fn clear(&mut self, key: &str) -> Result<()> {
    let known = self.text_keys().contains(&key)
      || self.file_keys().contains(&key)
      || self.list_keys().contains(&key);
    if !known {
      return Err(self.unknown(key));
    }
    self.put(key, DraftValue::Null);
    Ok(())
  }

  /// Checkbox toggle on a classification field. A field that is not yet a
  /// list is treated as an empty one; checking a present value or unchecking
  /// an absent one is a no-op.
  pub fn toggle(
    &mut self,
    key: &str,
    value: &str,
    checked: bool,
  ) -> Result<()> {
    self.ensure_field(key, self.list_keys())?;
    let mut values = self.list(key).to_vec();
    if checked {
      if !values.iter().any(|v| v == value) {
        values.push(value.to_owned());
      }
    } else {
      values.retain(|v| v != value);
    }
    self.put(key, DraftValue::List(values));
    Ok(())
  }

  /// Encode the draft as multipart parts: lists contribute one part per
  /// element, `Null` keys are omitted.
  pub fn to_form_parts(&self) -> Vec<FormPart> {
    let mut parts = Vec::new();
    for (key, value) in &self.fields {
      match value {
        DraftValue::Text(text) => parts.push(FormPart::Text {
          name:  key.clone(),
          value: text.clone(),
        }),
        DraftValue::List(values) => {
          parts.extend(values.iter().map(|v| FormPart::Text {
            name:  key.clone(),
            value: v.clone(),
          }))
        }
        DraftValue::File(upload) => parts.push(FormPart::File {
          name:   key.clone(),
          upload: upload.clone(),
        }),
        DraftValue::Null => {}
      }
    }
    parts
  }

  // ── Helpers ──────────────────────────────────────────────────────────────

  fn put(&mut self, key: &str, value: DraftValue) {
    match self.fields.iter_mut().find(|(k, _)| k == key) {
      Some((_, slot)) => *slot = value,
      None => self.fields.push((key.to_owned(), value)),
    }
  }

  fn text_keys(&self) -> &'static [&'static str] {
    match self.subject {
      SubjectType::Creator => CREATOR_TEXT_FIELDS,
      SubjectType::Company => COMPANY_TEXT_FIELDS,
      SubjectType::Other(_) => &[],
    }
  }

  fn file_keys(&self) -> &'static [&'static str] {
    match self.subject {
      SubjectType::Creator => &["profile_pic"],
      SubjectType::Company => &["logo"],
      SubjectType::Other(_) => &[],
    }
  }

  fn list_keys(&self) -> &'static [&'static str] {
    match self.subject {
      SubjectType::Creator => CLASSIFICATION_FIELDS,
      _ => &[],
    }
  }

  fn ensure_field(&self, key: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&key) {
      Ok(())
    } else {
      Err(self.unknown(key))
    }
  }

  fn unknown(&self, key: &str) -> Error {
    Error::UnknownField {
      subject: self.subject.clone(),
      key:     key.to_owned(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::profile::{CompanyProfile, CreatorProfile};

  fn creator_record() -> ProfileRecord {
    ProfileRecord {
      id:       7,
      username: "ana".into(),
      email:    "ana@example.com".into(),
      subject:  ProfileSubject::Creator(CreatorProfile {
        first_name: "Ana".into(),
        genres: vec![Classification {
          id:   3,
          name: "Pop".into(),
        }],
        ..Default::default()
      }),
    }
  }

  #[test]
  fn list_values_expand_and_null_values_are_omitted() {
    let mut draft = ProfileDraft::new(SubjectType::Creator);
    draft.toggle("genres", "pop", true).unwrap();
    draft.toggle("genres", "rock", true).unwrap();
    draft.set_text("address_1", "12 Elm St").unwrap();
    draft.clear("address_2").unwrap();

    let parts = draft.to_form_parts();
    let genres: Vec<_> = parts
      .iter()
      .filter(|p| p.name() == "genres")
      .map(|p| match p {
        FormPart::Text { value, .. } => value.as_str(),
        FormPart::File { .. } => panic!("genre encoded as a file"),
      })
      .collect();
    assert_eq!(genres, ["pop", "rock"]);
    assert!(parts.iter().all(|p| p.name() != "address_2"));
    assert!(parts.iter().any(|p| p.name() == "address_1"));
  }

  #[test]
  fn empty_text_is_still_sent() {
    let mut draft = ProfileDraft::new(SubjectType::Creator);
    draft.set_text("bio", "").unwrap();
    assert_eq!(draft.to_form_parts(), vec![FormPart::Text {
      name:  "bio".into(),
      value: String::new(),
    }]);
  }

  #[test]
  fn toggle_on_then_off_restores_the_set() {
    let mut draft = ProfileDraft::from_record(&creator_record());
    let before = draft.list("genres").to_vec();

    draft.toggle("genres", "9", true).unwrap();
    assert_eq!(draft.list("genres"), ["3", "9"]);
    draft.toggle("genres", "9", false).unwrap();
    assert_eq!(draft.list("genres"), before.as_slice());
  }

  #[test]
  fn toggle_does_not_duplicate() {
    let mut draft = ProfileDraft::from_record(&creator_record());
    draft.toggle("genres", "3", true).unwrap();
    assert_eq!(draft.list("genres"), ["3"]);
    draft.toggle("types", "1", false).unwrap();
    assert!(draft.list("types").is_empty());
  }

  #[test]
  fn toggle_recovers_from_a_non_list_value() {
    let mut draft = ProfileDraft::new(SubjectType::Creator);
    draft.clear("types").unwrap();
    draft.toggle("types", "2", true).unwrap();
    assert_eq!(draft.list("types"), ["2"]);
  }

  #[test]
  fn seeded_draft_never_uploads_files() {
    let draft = ProfileDraft::from_record(&creator_record());
    assert_eq!(draft.get("profile_pic"), Some(&DraftValue::Null));
    assert_eq!(draft.text("first_name"), "Ana");
    assert_eq!(draft.text("last_name"), "");
    assert!(
      draft
        .to_form_parts()
        .iter()
        .all(|p| matches!(p, FormPart::Text { .. }))
    );
  }

  #[test]
  fn keys_are_checked_against_the_subject() {
    let record = ProfileRecord {
      id:       2,
      username: "north".into(),
      email:    "hello@north.example".into(),
      subject:  ProfileSubject::Company(CompanyProfile::default()),
    };
    let mut draft = ProfileDraft::from_record(&record);

    assert!(draft.set_text("name", "Northside").is_ok());
    assert!(matches!(
      draft.set_text("stage_name", "x"),
      Err(Error::UnknownField { .. })
    ));
    assert!(draft.toggle("genres", "1", true).is_err());

    let logo = FileUpload::image("logo.PNG", vec![0; 16]).unwrap();
    assert!(draft.set_file("profile_pic", logo.clone()).is_err());
    draft.set_file("logo", logo).unwrap();
    assert!(
      draft
        .to_form_parts()
        .iter()
        .any(|p| matches!(p, FormPart::File { name, .. } if name == "logo"))
    );
  }

  #[test]
  fn other_subjects_accept_no_fields() {
    let mut draft = ProfileDraft::new(SubjectType::Other("Admin".into()));
    assert!(matches!(
      draft.set_text("bio", "Hello"),
      Err(Error::UnknownField { .. })
    ));
    assert!(draft.clear("bio").is_err());
    assert!(draft.to_form_parts().is_empty());
  }

  #[test]
  fn image_uploads_are_validated() {
    let ok = FileUpload::image("me.jpeg", vec![1, 2, 3]).unwrap();
    assert_eq!(ok.content_type, "image/jpeg");

    assert!(matches!(
      FileUpload::image("me.bmp", vec![]),
      Err(Error::UnsupportedImage { .. })
    ));
    assert!(matches!(
      FileUpload::image("big.png", vec![0; MAX_UPLOAD_BYTES + 1]),
      Err(Error::FileTooLarge { .. })
    ));
  }
}
