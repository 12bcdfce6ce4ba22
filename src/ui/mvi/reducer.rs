//! Reducer trait.

use super::intent::Intent;
use super::state::UiState;

/// Transforms state based on intents.
///
/// The only place where state transitions happen. Must stay pure:
/// no I/O, no clocks, no randomness.
pub trait Reducer {
    type State: UiState;

    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
