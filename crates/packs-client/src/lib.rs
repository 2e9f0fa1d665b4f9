//! HTTP implementation of [`packs_core::api::ProfileApi`].
//!
//! Reads are JSON `GET`s, profile writes are multipart `PUT`s, and every
//! request carries the session cookie from [`ApiConfig`].

pub mod client;
pub mod error;

mod form;

pub use client::{ApiConfig, HttpApi};
pub use error::{Error, Result};
pub use reqwest::{Method, StatusCode};
