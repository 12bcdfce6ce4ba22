//! Admin REST API client.
//!
//! - [`client`]: the shared reqwest client with per-call bearer credential
//! - [`error`]: normalized failures
//! - [`resource`]: endpoint catalog per resource
//! - [`types`]: request/response shapes and display helpers

pub mod client;
pub mod error;
pub mod resource;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use resource::{FilterSpec, Resource};
pub use types::{EntityPayload, ListPage, ListQuery, Metadata, StatsRange};
