//! Screen controllers.
//!
//! A controller owns the state of one screen and never performs I/O
//! itself. Whenever its inputs change it hands out a request value
//! (`poll_effect`, `submit`, `confirm_*`); whoever executes the request
//! reports the outcome back through the matching `on_*_result` method.
//! The TUI runtime and the CLI both drive controllers this way.

pub mod catalog;
pub mod dashboard;
pub mod detail;
pub mod edit;
pub mod intermediaries;
pub mod list;
pub mod profile;
pub mod sign_in;

use thiserror::Error;

use crate::api::Resource;
use crate::config::Credential;

pub use dashboard::{DashboardController, DashboardView, StatsRequest};
pub use detail::{ActionRequest, DetailAction, DetailController, DetailView, FieldValue};
pub use edit::{EditController, EditOutcome, EditView, UpdateRequest};
pub use intermediaries::{ClientsInfo, IntermediaryPanel, SectionRequest, SectionResult};
pub use list::{DeleteRequest, ListBody, ListController, ListRequest, ListView, QueryParams};
pub use profile::{ProfileController, ProfileRequest, ProfileView};
pub use sign_in::{LoginRequest, SignInController, SignInField};

/// Blocking yes/no question shown before a destructive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
}

/// Fetch one entity by id.
#[derive(Debug, Clone, PartialEq)]
pub struct GetRequest {
    pub resource: Resource,
    pub id: String,
    pub generation: u64,
    pub credential: Credential,
}

/// Why a form could not be submitted. No request is sent in any case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("a request is already in progress")]
    InFlight,

    #[error("the form has not finished loading")]
    NotLoaded,

    #[error("not signed in")]
    SignedOut,
}
