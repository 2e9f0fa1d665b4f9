//! Async HTTP client wrapping the packs JSON API.

use std::time::Duration;

use packs_core::{
  api::{ClassificationUpdate, ProfileApi},
  draft::FormPart,
  profile::{CreatorProfile, ProfileRecord, SavedProfile},
  submission::Submission,
  user::{StatusChange, UserStatus, UserSummary},
};
use reqwest::{Client, Method, RequestBuilder, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{Error, Result, form::multipart_form};

const PROFILE: &str = "/profile/";
const CLASSIFICATIONS: &str = "/profile/update_genres_types";
const USER_SUBMISSIONS: &str = "/opportunities/submissions/user";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the packs API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url:       String,
  /// Value of the server's `session` cookie, from a browser login.
  pub session_cookie: Option<String>,
  /// CSRF token the server expects as both cookie and `X-CSRFToken` header
  /// on writes.
  pub csrf_token:     Option<String>,
  pub timeout:        Duration,
}

impl ApiConfig {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url:       base_url.into(),
      session_cookie: None,
      csrf_token:     None,
      timeout:        DEFAULT_TIMEOUT,
    }
  }

  fn cookie_header(&self) -> Option<String> {
    let pairs: Vec<String> = [
      ("session", self.session_cookie.as_deref()),
      ("csrf_token", self.csrf_token.as_deref()),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
    .collect();
    (!pairs.is_empty()).then(|| pairs.join("; "))
  }
}

/// Async HTTP client for the packs REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpApi {
  client: Client,
  config: ApiConfig,
}

impl HttpApi {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(Error::Build)?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ApiConfig { &self.config }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let mut req = self.client.request(method, self.url(path));
    if let Some(cookie) = self.config.cookie_header() {
      req = req.header(header::COOKIE, cookie);
    }
    if let Some(token) = &self.config.csrf_token {
      req = req.header("X-CSRFToken", token);
    }
    req
  }

  /// Send `req` and decode a JSON success body; any other status becomes
  /// [`Error::Status`].
  async fn execute<T: DeserializeOwned>(
    &self,
    method: Method,
    path: &str,
    req: RequestBuilder,
  ) -> Result<T> {
    debug!(%method, path, "sending request");
    let resp = req.send().await.map_err(|source| Error::Transport {
      method: method.clone(),
      path: path.to_owned(),
      source,
    })?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      warn!(%method, path, %status, "request rejected");
      return Err(Error::Status {
        method,
        path: path.to_owned(),
        status,
        body,
      });
    }
    resp.json().await.map_err(|source| Error::Decode {
      path: path.to_owned(),
      source,
    })
  }
}

// ─── ProfileApi impl ─────────────────────────────────────────────────────────

impl ProfileApi for HttpApi {
  type Error = Error;

  // ── Profile ───────────────────────────────────────────────────────────────

  /// `GET /api/profile/`
  async fn fetch_profile(&self) -> Result<ProfileRecord> {
    let req = self.request(Method::GET, PROFILE);
    self.execute(Method::GET, PROFILE, req).await
  }

  /// `PUT /api/profile/` with a multipart body. The reply may carry only the
  /// account envelope, without the subject object.
  async fn update_profile(&self, parts: Vec<FormPart>) -> Result<SavedProfile> {
    let form = multipart_form(parts)?;
    let req = self.request(Method::PUT, PROFILE).multipart(form);
    self.execute(Method::PUT, PROFILE, req).await
  }

  /// `PUT /api/profile/update_genres_types`
  async fn update_classifications(
    &self,
    update: ClassificationUpdate,
  ) -> Result<CreatorProfile> {
    let req = self.request(Method::PUT, CLASSIFICATIONS).json(&update);
    self.execute(Method::PUT, CLASSIFICATIONS, req).await
  }

  // ── Submissions ───────────────────────────────────────────────────────────

  /// `GET /api/opportunities/submissions/user`
  async fn list_user_submissions(&self) -> Result<Vec<Submission>> {
    let req = self.request(Method::GET, USER_SUBMISSIONS);
    self.execute(Method::GET, USER_SUBMISSIONS, req).await
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `GET /api/users/<id>`
  async fn get_user(&self, user_id: i64) -> Result<UserSummary> {
    let path = format!("/users/{user_id}");
    let req = self.request(Method::GET, &path);
    self.execute(Method::GET, &path, req).await
  }

  /// `PUT /api/users/<id>/status`
  async fn update_user_status(
    &self,
    user_id: i64,
    status: UserStatus,
  ) -> Result<UserSummary> {
    let path = format!("/users/{user_id}/status");
    let req = self
      .request(Method::PUT, &path)
      .json(&StatusChange { status });
    self.execute(Method::PUT, &path, req).await
  }
}
