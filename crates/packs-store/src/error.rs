//! Error type for `packs-store`.

use thiserror::Error;

/// Boxed API error; the concrete type depends on the `ProfileApi` in use.
pub type ApiError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StoreError {
  /// Network failure or non-success response on read. The previous record
  /// is untouched.
  #[error("fetching the profile failed: {0}")]
  FetchFailed(#[source] ApiError),

  /// Validation or network failure on write. The caller's draft is
  /// untouched.
  #[error("saving the profile failed: {0}")]
  UpdateFailed(#[source] ApiError),

  #[error("a profile fetch is still in flight; save again once it completes")]
  FetchInFlight,

  /// The session ended while the request was outstanding; its result was
  /// discarded.
  #[error("the session ended before the response arrived")]
  SessionEnded,
}

impl StoreError {
  /// The underlying API error, if it is an `E`.
  pub fn api_error<E>(&self) -> Option<&E>
  where
    E: std::error::Error + 'static,
  {
    match self {
      Self::FetchFailed(e) | Self::UpdateFailed(e) => e.downcast_ref::<E>(),
      Self::FetchInFlight | Self::SessionEnded => None,
    }
  }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
