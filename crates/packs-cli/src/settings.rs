//! Layered CLI configuration: defaults, then an optional TOML file, then
//! `PACKS_*` environment variables. Command-line flags are applied last by
//! the caller.

use std::{path::Path, time::Duration};

use anyhow::Context as _;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use packs_client::ApiConfig;
use serde::Deserialize;

pub const DEFAULT_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
  /// Base URL of the packs server, without the `/api` suffix.
  pub url:          String,
  /// `session` cookie copied from a signed-in browser.
  #[serde(default)]
  pub session:      Option<String>,
  #[serde(default)]
  pub csrf_token:   Option<String>,
  pub timeout_secs: u64,
}

impl CliConfig {
  /// Read `path` (when given; it must then exist) and the environment on
  /// top of the built-in defaults.
  pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
    let mut builder = defaults()?;
    if let Some(path) = path {
      builder = builder.add_source(File::from(path));
    }
    resolve(builder.add_source(Environment::with_prefix("PACKS")))
  }

  /// Apply command-line overrides; `None` keeps the layered value.
  pub fn override_with(
    &mut self,
    url: Option<String>,
    session: Option<String>,
    csrf_token: Option<String>,
  ) {
    if let Some(url) = url {
      self.url = url;
    }
    if session.is_some() {
      self.session = session;
    }
    if csrf_token.is_some() {
      self.csrf_token = csrf_token;
    }
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      base_url:       self.url.clone(),
      session_cookie: self.session.clone(),
      csrf_token:     self.csrf_token.clone(),
      timeout:        Duration::from_secs(self.timeout_secs),
    }
  }
}

fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
  Config::builder()
    .set_default("url", DEFAULT_URL)?
    .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)
    .context("setting configuration defaults")
}

fn resolve(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<CliConfig> {
  builder
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("failed to deserialise CliConfig")
}
