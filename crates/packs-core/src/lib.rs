//! Core types and trait definitions for the packs profile client.
//!
//! This crate has no HTTP or runtime dependencies. The
//! state container (`packs-store`), the HTTP implementation
//! (`packs-client`) and the CLI all depend on it.

pub mod api;
pub mod draft;
pub mod error;
pub mod lifecycle;
pub mod profile;
pub mod subject;
pub mod submission;
pub mod user;

mod de;

pub use error::{Error, Result};
