//! Command dispatch: every command loads the profile through the store,
//! checks the command's [`Access`], then renders its view.

use std::{path::Path, sync::Arc};

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use packs_core::{
  api::{ClassificationUpdate, ProfileApi},
  draft::{FileUpload, ProfileDraft},
  profile::ProfileRecord,
  subject::Access,
  user::UserStatus,
};
use packs_store::ProfileStore;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::render;

// ─── Commands ────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Show the signed-in account's profile page.
  Profile,
  /// Edit profile fields and save them in a single request.
  Edit(EditArgs),
  /// Replace the creator's genres and types by id.
  Classify {
    #[arg(long = "genre", value_name = "ID")]
    genres: Vec<i64>,
    #[arg(long = "type", value_name = "ID")]
    types:  Vec<i64>,
  },
  /// List the signed-in creator's submissions.
  Submissions,
  /// Inspect or change other accounts (company accounts only).
  User {
    #[command(subcommand)]
    command: UserCommand,
  },
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
  /// Set a text field, e.g. `--set stage_name=Ana`.
  #[arg(
    long = "set",
    value_name = "KEY=VALUE",
    value_parser = parse_assignment
  )]
  pub set:           Vec<(String, String)>,
  /// Leave a field out of the saved form.
  #[arg(long = "unset", value_name = "KEY")]
  pub unset:         Vec<String>,
  #[arg(long = "genre", value_name = "ID")]
  pub add_genres:    Vec<String>,
  #[arg(long = "no-genre", value_name = "ID")]
  pub remove_genres: Vec<String>,
  #[arg(long = "type", value_name = "ID")]
  pub add_types:     Vec<String>,
  #[arg(long = "no-type", value_name = "ID")]
  pub remove_types:  Vec<String>,
  /// Upload a new creator profile picture.
  #[arg(long, value_name = "FILE")]
  pub profile_pic:   Option<std::path::PathBuf>,
  /// Upload a new company logo.
  #[arg(long, value_name = "FILE")]
  pub logo:          Option<std::path::PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
  /// Show an account with its application status.
  Show { id: i64 },
  /// Move an account to another application status.
  Status {
    id:     i64,
    #[arg(value_parser = parse_status)]
    status: UserStatus,
  },
}

impl Command {
  fn access(&self) -> Access {
    match self {
      Self::Profile | Self::Edit(_) => Access::Anyone,
      Self::Classify { .. } | Self::Submissions => Access::CreatorOnly,
      Self::User { .. } => Access::CompanyOnly,
    }
  }
}

/// `key=value`; the value may be empty or contain further `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
  match raw.split_once('=') {
    Some((key, value)) if !key.trim().is_empty() => {
      Ok((key.trim().to_owned(), value.to_owned()))
    }
    _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
  }
}

fn parse_status(raw: &str) -> Result<UserStatus, String> {
  UserStatus::parse(raw).map_err(|e| {
    let known: Vec<_> = UserStatus::iter().map(|s| s.to_string()).collect();
    format!("{e}; expected one of: {}", known.join(", "))
  })
}

// ─── App ─────────────────────────────────────────────────────────────────────

pub struct App<A> {
  store: Arc<ProfileStore<A>>,
}

impl<A: ProfileApi> App<A> {
  pub fn new(store: Arc<ProfileStore<A>>) -> Self { Self { store } }

  /// Run `command` and return its rendered output.
  pub async fn run(&self, command: Command) -> Result<String> {
    let record = self.enter(command.access()).await?;
    match command {
      Command::Profile => self.profile(&record).await,
      Command::Edit(args) => self.edit(&record, args).await,
      Command::Classify { genres, types } => {
        let creator = self
          .store
          .update_classifications(ClassificationUpdate { genres, types })
          .await
          .context("saving classifications")?;
        Ok(render::classifications(&creator))
      }
      Command::Submissions => {
        let submissions = self
          .store
          .api()
          .list_user_submissions()
          .await
          .context("listing submissions")?;
        Ok(render::submissions(&submissions))
      }
      Command::User { command } => self.user(command).await,
    }
  }

  /// Load the profile and refuse to continue unless `access` admits it.
  async fn enter(&self, access: Access) -> Result<ProfileRecord> {
    let record = self.store.fetch().await.context("loading profile")?;
    let subject = record.subject_type();
    if !access.permits(&subject) {
      bail!("this command is not available to {subject} accounts");
    }
    debug!(%subject, ?access, "access granted");
    Ok(record)
  }

  // ── Views ──────────────────────────────────────────────────────────────

  async fn profile(&self, record: &ProfileRecord) -> Result<String> {
    let status = match self.store.api().get_user(record.id).await {
      Ok(user) => Some(user.status),
      Err(e) => {
        warn!(error = %e, "could not load application status");
        None
      }
    };
    Ok(render::profile_page(record, status))
  }

  async fn edit(
    &self,
    record: &ProfileRecord,
    args: EditArgs,
  ) -> Result<String> {
    let mut draft = ProfileDraft::from_record(record);

    for (key, value) in args.set {
      draft.set_text(&key, value)?;
    }
    for (key, ids, checked) in [
      ("genres", args.add_genres, true),
      ("genres", args.remove_genres, false),
      ("types", args.add_types, true),
      ("types", args.remove_types, false),
    ] {
      for id in ids {
        draft.toggle(key, &id, checked)?;
      }
    }
    let uploads = [("profile_pic", args.profile_pic), ("logo", args.logo)];
    for (key, path) in uploads {
      if let Some(path) = path {
        draft.set_file(key, read_upload(&path).await?)?;
      }
    }
    for key in args.unset {
      draft.clear(&key)?;
    }

    let saved = self.store.update(&draft).await.context("saving profile")?;
    Ok(render::profile_page(&saved, None))
  }

  async fn user(&self, command: UserCommand) -> Result<String> {
    let api = self.store.api();
    let user = match command {
      UserCommand::Show { id } => {
        api.get_user(id).await.with_context(|| format!("loading user {id}"))?
      }
      UserCommand::Status { id, status } => api
        .update_user_status(id, status)
        .await
        .with_context(|| format!("changing the status of user {id}"))?,
    };
    Ok(render::user_summary(&user))
  }
}

async fn read_upload(path: &Path) -> Result<FileUpload> {
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;
  let file_name = path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default();
  Ok(FileUpload::image(file_name, bytes)?)
}
