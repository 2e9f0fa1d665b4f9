//! `packs`: command-line client for a packs talent profile.
//!
//! # Usage
//!
//! ```
//! packs --url https://packs.example --session <cookie> profile
//! packs --config ~/.config/packs/config.toml edit --set stage_name=Ana --genre 3
//! packs user status 42 "Premium Monthly"
//! ```

mod app;
mod render;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use app::{App, Command};
use clap::Parser;
use packs_client::HttpApi;
use packs_store::ProfileStore;
use settings::CliConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "packs",
  version,
  about = "Profile client for the packs talent platform"
)]
struct Cli {
  /// Path to a TOML config file (url, session, csrf_token, timeout_secs).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the packs server.
  #[arg(long, env = "PACKS_URL", global = true)]
  url: Option<String>,

  /// Value of the `session` cookie from a signed-in browser.
  #[arg(long, env = "PACKS_SESSION", hide_env_values = true, global = true)]
  session: Option<String>,

  /// CSRF token sent with writes.
  #[arg(long, env = "PACKS_CSRF_TOKEN", hide_env_values = true, global = true)]
  csrf_token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut cfg = CliConfig::load(cli.config.as_deref())?;
  cfg.override_with(cli.url, cli.session, cli.csrf_token);

  let api = HttpApi::new(cfg.api_config())
    .context("failed to build HTTP client")?;
  let store = Arc::new(ProfileStore::new(api));
  let app = App::new(Arc::clone(&store));

  match app.run(cli.command).await {
    Ok(output) => {
      println!("{output}");
      Ok(())
    }
    Err(e) if session_expired(&e) => {
      store.end_session();
      Err(e.context(format!(
        "the session at {} has expired; sign in again and pass the new --session",
        cfg.url
      )))
    }
    Err(e) => Err(e),
  }
}

/// Whether the server answered 401 somewhere in `err`'s chain.
fn session_expired(err: &anyhow::Error) -> bool {
  err.chain().any(|cause| {
    cause
      .downcast_ref::<packs_client::Error>()
      .is_some_and(packs_client::Error::is_unauthorized)
  })
}
