use crate::api::Metadata;
use crate::ui::mvi::UiState;

/// Message used when a failure arrives without any text.
pub const FALLBACK_ERROR: &str = "Request failed.";

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
    /// Sibling payload fields (counts, related entities).
    pub extra: Metadata,
    /// Generation of the most recent Request; older outcomes are dropped.
    pub generation: u64,
}

/// Screens mount already loading: the first request is about to go out.
impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            data: None,
            extra: Metadata::new(),
            generation: 0,
        }
    }
}

impl<T: Clone + PartialEq + Send + 'static> UiState for FetchState<T> {}

impl<T> FetchState<T> {
    /// Generation to tag the next Request with.
    pub fn next_generation(&self) -> u64 {
        self.generation.wrapping_add(1)
    }

    /// Failure message, only once loading has finished.
    pub fn failure(&self) -> Option<&str> {
        if self.loading {
            None
        } else {
            self.error.as_deref()
        }
    }

    /// Data, only once loading has finished without error.
    pub fn ready(&self) -> Option<&T> {
        if self.loading || self.error.is_some() {
            None
        } else {
            self.data.as_ref()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MutationKind {
    #[default]
    Update,
    Unlock,
    Refund,
    Delete,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Update => "update",
            MutationKind::Unlock => "unlock",
            MutationKind::Refund => "refund",
            MutationKind::Delete => "delete",
        }
    }
}

/// One in-flight write. Idle until its first Request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MutationState {
    pub kind: MutationKind,
    pub loading: bool,
    pub error: Option<String>,
}

impl UiState for MutationState {}

impl MutationState {
    pub fn new(kind: MutationKind) -> Self {
        Self {
            kind,
            loading: false,
            error: None,
        }
    }
}
