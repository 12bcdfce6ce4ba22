//! Base trait for UI state.

/// Marker trait for UI state objects.
///
/// `Default` is the initial state a screen mounts with, `PartialEq`
/// lets tests and the render loop compare snapshots.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
