use crate::api::Metadata;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum FetchIntent<T> {
    Request {
        generation: u64,
    },
    Success {
        generation: u64,
        data: T,
        extra: Metadata,
    },
    Fail {
        generation: u64,
        message: String,
    },
}

impl<T: Send + 'static> Intent for FetchIntent<T> {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationIntent {
    Request,
    Success,
    Fail { message: String },
}

impl Intent for MutationIntent {}
