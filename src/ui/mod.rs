//! Terminal front end.
//!
//! Screens are driven by the controllers in [`crate::controller`]; this
//! module owns the event loop, key bindings, drawing and the async worker
//! that executes their requests.

pub mod app;
pub mod events;
pub mod fetch;
pub mod footer;
pub mod header;
pub mod input;
pub mod layout;
pub mod mvi;
pub mod notice;
pub mod pagination;
pub mod render;
pub mod route;
pub mod runtime;
pub mod terminal_guard;
pub mod theme;
pub mod worker;

pub use runtime::run;
