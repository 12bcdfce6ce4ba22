//! Model-View-Intent (MVI) primitives shared by every screen.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──── controller / runtime ────┘
//! ```
//!
//! - **State**: plain value describing what a screen shows
//! - **Intent**: a user action or an API outcome
//! - **Reducer**: pure `(State, Intent) -> State`

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
