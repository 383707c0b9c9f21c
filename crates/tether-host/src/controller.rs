#![forbid(unsafe_code)]

//! The controller lifecycle contract between a host and its attached units.

/// An attachable behavior unit that receives lifecycle notifications from
/// its host.
///
/// Every hook has a default no-op body; a controller implements only the
/// notifications it cares about. All hooks run synchronously on the host's
/// own (single-threaded) execution context.
///
/// # Ordering
///
/// For each update cycle, [`host_update`](Controller::host_update) is
/// delivered to every attached controller before the host recomputes its
/// own output for that cycle.
pub trait Controller {
    /// The host entered the connected state (or the controller attached to
    /// an already connected host).
    fn host_connected(&self) {}

    /// The host left the connected state.
    fn host_disconnected(&self) {}

    /// An update cycle is about to run. Fired once per cycle, before the
    /// cycle's effects are applied.
    fn host_update(&self) {}
}
