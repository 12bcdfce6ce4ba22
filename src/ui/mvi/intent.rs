//! Base trait for intents.

/// Marker trait for intent objects.
///
/// An intent is either something the operator did (submit, page change)
/// or something the API answered (success, failure). Reducers turn
/// intents into new states.
pub trait Intent: Send + 'static {}
