//! Client-side state container for the signed-in account's profile.
//!
//! [`ProfileStore`] owns the single record slot, proxies reads and writes to
//! any [`packs_core::api::ProfileApi`], and publishes every state transition
//! on a [`tokio::sync::watch`] channel for views to re-render from.

mod store;

pub mod error;

pub use error::{Result, StoreError};
pub use store::ProfileStore;
