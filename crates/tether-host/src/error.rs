#![forbid(unsafe_code)]

//! Error type for fallible host state access.

use thiserror::Error;

/// Errors surfaced by the fallible `Host` state accessors.
///
/// The infallible accessors panic on the same conditions; callers that may
/// run inside a lifecycle notification should prefer the `try_*` variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Component state is already borrowed higher up the call stack
    /// (typically from inside a lifecycle notification or a slot-change
    /// callback).
    #[error("component state is already borrowed (re-entrant access)")]
    ReentrantStateAccess,
}
