use std::marker::PhantomData;

use crate::ui::fetch::intent::{FetchIntent, MutationIntent};
use crate::ui::fetch::state::{FetchState, MutationState, FALLBACK_ERROR};
use crate::ui::mvi::Reducer;

pub struct FetchReducer<T>(PhantomData<T>);

impl<T: Clone + PartialEq + Send + 'static> Reducer for FetchReducer<T> {
    type State = FetchState<T>;
    type Intent = FetchIntent<T>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FetchIntent::Request { generation } => FetchState {
                loading: true,
                error: None,
                generation,
                ..state
            },
            FetchIntent::Success {
                generation,
                data,
                extra,
            } => {
                if generation != state.generation {
                    tracing::trace!(generation, current = state.generation, "stale success dropped");
                    return state;
                }
                let mut merged = state.extra;
                merged.extend(extra);
                FetchState {
                    loading: false,
                    error: None,
                    data: Some(data),
                    extra: merged,
                    generation,
                }
            }
            FetchIntent::Fail {
                generation,
                message,
            } => {
                if generation != state.generation {
                    tracing::trace!(generation, current = state.generation, "stale failure dropped");
                    return state;
                }
                FetchState {
                    loading: false,
                    error: Some(non_empty(message)),
                    ..state
                }
            }
        }
    }
}

pub struct MutationReducer;

impl Reducer for MutationReducer {
    type State = MutationState;
    type Intent = MutationIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            MutationIntent::Request => MutationState {
                loading: true,
                error: None,
                ..state
            },
            MutationIntent::Success => MutationState {
                loading: false,
                error: None,
                ..state
            },
            MutationIntent::Fail { message } => MutationState {
                loading: false,
                error: Some(non_empty(message)),
                ..state
            },
        }
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        message
    }
}
