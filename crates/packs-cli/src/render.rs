//! Plain-text renderings of the profile, submissions and user views.

use chrono::NaiveDateTime;
use packs_core::{
  profile::{
    Classification, CompanyProfile, CreatorProfile, ProfileRecord,
    ProfileSubject,
  },
  submission::Submission,
  user::{UserStatus, UserSummary},
};

/// Characters of submission notes shown in the list view.
pub const NOTES_PREVIEW_CHARS: usize = 30;

const LABEL_WIDTH: usize = 22;

// ─── Profile page ─────────────────────────────────────────────────────────────

/// The profile page: header, application/subscription banner, then the
/// subject's fields. Blank fields are skipped.
pub fn profile_page(
  record: &ProfileRecord,
  status: Option<UserStatus>,
) -> String {
  let mut lines = vec![
    record.display_name(),
    format!("@{} <{}>", record.username, record.email),
  ];

  match status {
    Some(status) if status.needs_application() => {
      lines.push(String::new());
      lines.push(
        "You have not applied yet. Apply to start submitting to opportunities."
          .into(),
      );
    }
    Some(status) if status.has_subscription() => {
      lines.push(String::new());
      lines.push(format!("Subscription: {status}"));
    }
    Some(status) => {
      lines.push(String::new());
      lines.push(format!("Application: {status}"));
    }
    None => {}
  }

  lines.push(String::new());
  match &record.subject {
    ProfileSubject::Creator(creator) => creator_fields(creator, &mut lines),
    ProfileSubject::Company(company) => company_fields(company, &mut lines),
    ProfileSubject::Other(tag) => {
      lines.push(format!("No profile details for {tag} accounts."));
    }
  }
  lines.join("\n")
}

fn creator_fields(creator: &CreatorProfile, lines: &mut Vec<String>) {
  for (key, value) in creator.text_fields() {
    if value.is_empty() || key.starts_with("address") {
      continue;
    }
    lines.push(field(&label(key), value));
  }
  let address = creator.address_line();
  if !address.is_empty() {
    lines.push(field("Address", &address));
  }
  lines.push(field("Genres", &names(&creator.genres)));
  lines.push(field("Types", &names(&creator.types)));
  if let Some(joined) = creator.created_date {
    lines.push(field("Member since", &date(joined)));
  }
}

fn company_fields(company: &CompanyProfile, lines: &mut Vec<String>) {
  for (name, value) in [
    ("Name", &company.name),
    ("Bio", &company.bio),
    ("Logo", &company.logo),
  ] {
    if !value.is_empty() {
      lines.push(field(name, value));
    }
  }
  if let Some(joined) = company.created_date {
    lines.push(field("Member since", &date(joined)));
  }
}

/// The classification sets after an update.
pub fn classifications(creator: &CreatorProfile) -> String {
  [
    field("Genres", &names(&creator.genres)),
    field("Types", &names(&creator.types)),
  ]
  .join("\n")
}

// ─── Submissions ─────────────────────────────────────────────────────────────

/// Submissions as a fixed-width table, in the order given.
pub fn submissions(submissions: &[Submission]) -> String {
  if submissions.is_empty() {
    return "No submissions yet.".into();
  }

  let mut lines = vec![format!(
    "{:<6} {:<24} {:<24} {:<10} {:<5} {:<10} {}",
    "ID", "NAME", "OPPORTUNITY", "STATUS", "BPM", "CREATED", "NOTES"
  )];
  for s in submissions {
    let created = s.created_date.map(date).unwrap_or_default();
    lines.push(
      format!(
        "{:<6} {:<24} {:<24} {:<10} {:<5} {:<10} {}",
        s.id,
        s.name,
        s.opportunity_name,
        s.status,
        s.bpm,
        created,
        s.notes_preview(NOTES_PREVIEW_CHARS),
      )
      .trim_end()
      .to_owned(),
    );
  }
  lines.join("\n")
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn user_summary(user: &UserSummary) -> String {
  let mut lines = vec![
    field("User", &format!("{} (#{})", user.username, user.id)),
    field("Email", &user.email),
    field("Type", user.subject.as_str()),
    field("Status", user.status.as_ref()),
  ];
  if let Some(creator) = &user.creator {
    let name = format!("{} {}", creator.first_name, creator.last_name);
    if !name.trim().is_empty() {
      lines.push(field("Name", name.trim()));
    }
    lines.push(field("Genres", &names(&creator.genres)));
  }
  lines.join("\n")
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn field(label: &str, value: &str) -> String {
  format!("{:<width$}{value}", format!("{label}:"), width = LABEL_WIDTH)
    .trim_end()
    .to_owned()
}

/// `previous_projects` → `Previous projects`.
fn label(key: &str) -> String {
  let spaced = key.replace('_', " ");
  let mut chars = spaced.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

fn names(entries: &[Classification]) -> String {
  if entries.is_empty() {
    return "none".into();
  }
  entries
    .iter()
    .map(|c| c.name.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

fn date(at: NaiveDateTime) -> String { at.format("%Y-%m-%d").to_string() }
