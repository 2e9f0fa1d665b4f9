//! Error types for `packs-core`.

use thiserror::Error;

use crate::subject::SubjectType;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown user status: {0:?}")]
  UnknownStatus(String),

  #[error("{key:?} is not an editable field for a {subject} profile")]
  UnknownField { subject: SubjectType, key: String },

  #[error("{file_name:?} is not a jpg, jpeg, png or gif image")]
  UnsupportedImage { file_name: String },

  #[error("{file_name:?} is {size} bytes; uploads are limited to {limit} bytes")]
  FileTooLarge {
    file_name: String,
    size:      usize,
    limit:     usize,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
