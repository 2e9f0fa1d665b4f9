//! Error type for `packs-client`.

use reqwest::{Method, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  /// The request never produced a response (connection, TLS, timeout).
  #[error("{method} {path} failed: {source}")]
  Transport {
    method: Method,
    path:   String,
    source: reqwest::Error,
  },

  /// The server answered with a non-success status. The API has no error
  /// schema, so the body is kept verbatim for diagnostics.
  #[error("{method} {path} returned {status}")]
  Status {
    method: Method,
    path:   String,
    status: StatusCode,
    body:   String,
  },

  #[error("deserialising {path} response: {source}")]
  Decode {
    path:   String,
    source: reqwest::Error,
  },

  #[error("invalid upload content type {content_type:?}: {source}")]
  ContentType {
    content_type: String,
    source:       reqwest::Error,
  },
}

impl Error {
  /// The HTTP status, when the server answered.
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Status { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// The session is missing or expired; the caller should end it.
  pub fn is_unauthorized(&self) -> bool {
    self.status() == Some(StatusCode::UNAUTHORIZED)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
