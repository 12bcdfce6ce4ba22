//! Admin console for a vehicle auction platform.
//!
//! [`api`] talks to the REST backend, [`controller`] holds per-screen state
//! machines, and [`ui`] renders them in the terminal. The binary also
//! exposes the same operations as one-shot commands.

pub mod api;
pub mod config;
pub mod controller;
pub mod logging;
pub mod session;
pub mod ui;
