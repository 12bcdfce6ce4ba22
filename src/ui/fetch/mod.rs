//! Request lifecycle state shared by every fetching screen.
//!
//! [`FetchState`] tracks one read (list page, entity, statistics);
//! [`MutationState`] tracks one write of a given [`MutationKind`]. Both
//! move through the same three intents: Request, then Success or Fail.

mod intent;
mod reducer;
mod state;

pub use intent::{FetchIntent, MutationIntent};
pub use reducer::{FetchReducer, MutationReducer};
pub use state::{FetchState, MutationKind, MutationState};
