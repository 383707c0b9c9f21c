#![forbid(unsafe_code)]

//! The host: component state, attached controllers, update scheduling, and
//! the slot content area.
//!
//! # Design
//!
//! [`Host<S>`] is a cheaply cloneable handle (`Rc` inside) over a single
//! component instance: its state `S`, the controllers attached to it, a
//! coalescing update-request flag, and the content area controllers may
//! observe. All access is single-threaded; interior mutability is
//! `Cell`/`RefCell`.
//!
//! Controllers are stored as `Weak` references: dropping a controller
//! handle detaches it, and dead entries are pruned lazily during
//! notification.
//!
//! # Invariants
//!
//! 1. Lifecycle notifications are delivered to controllers in attachment
//!    order.
//! 2. `host_update` is delivered at most once per update cycle, and the
//!    pending flag is cleared before delivery — a `request_update` issued
//!    from inside a cycle schedules a future cycle, never re-enters the
//!    current one.
//! 3. Multiple `request_update` calls between cycles coalesce into one
//!    pending cycle.
//! 4. Slot-change signals fire only for slots declared in the host's
//!    output, and only when that slot's assigned content changes.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::content::{ContentArea, Element, Node};
use crate::controller::Controller;
use crate::error::HostError;
use crate::events::{SlotSignal, Subscription};

#[cfg(feature = "tracing")]
use crate::logging::{debug, trace};
#[cfg(not(feature = "tracing"))]
use crate::{debug, trace};

// ─── Inner shared state ──────────────────────────────────────────────────────

struct HostInner<S> {
    state: RefCell<S>,
    controllers: RefCell<Vec<Weak<dyn Controller>>>,
    connected: Cell<bool>,
    update_pending: Cell<bool>,
    /// Total `request_update` calls, counting coalesced requests.
    update_requests: Cell<u64>,
    /// Total update cycles actually run.
    update_cycles: Cell<u64>,
    content: RefCell<ContentArea>,
    slot_signal: Rc<SlotSignal>,
}

// ─── Host ────────────────────────────────────────────────────────────────────

/// Handle to a single component host instance.
///
/// Cloning shares the same underlying host; controllers hold a clone and
/// never touch host internals directly — their only mutating entry point
/// is [`request_update`](Host::request_update).
pub struct Host<S> {
    inner: Rc<HostInner<S>>,
}

impl<S> Clone for Host<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for Host<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("connected", &self.inner.connected.get())
            .field("update_pending", &self.inner.update_pending.get())
            .field("controllers", &self.inner.controllers.borrow().len())
            .finish()
    }
}

impl<S> Host<S> {
    /// Create a disconnected host around the given component state.
    #[must_use]
    pub fn new(state: S) -> Self {
        Self {
            inner: Rc::new(HostInner {
                state: RefCell::new(state),
                controllers: RefCell::new(Vec::new()),
                connected: Cell::new(false),
                update_pending: Cell::new(false),
                update_requests: Cell::new(0),
                update_cycles: Cell::new(0),
                content: RefCell::new(ContentArea::default()),
                slot_signal: Rc::new(SlotSignal::new()),
            }),
        }
    }

    // ── Controller attachment ────────────────────────────────────────

    /// Attach a controller for lifecycle delivery.
    ///
    /// The host holds only a weak reference: dropping the controller
    /// detaches it. If the host is already connected, `host_connected`
    /// is delivered immediately.
    pub fn attach(&self, controller: &Rc<dyn Controller>) {
        self.inner
            .controllers
            .borrow_mut()
            .push(Rc::downgrade(controller));
        debug!("controller attached");
        if self.inner.connected.get() {
            controller.host_connected();
        }
    }

    fn notify(&self, f: impl Fn(&dyn Controller)) {
        // Snapshot live controllers and prune dead weaks, releasing the
        // borrow before any callback runs (a callback may attach).
        let live: Vec<Rc<dyn Controller>> = {
            let mut controllers = self.inner.controllers.borrow_mut();
            controllers.retain(|weak| weak.strong_count() > 0);
            controllers.iter().filter_map(Weak::upgrade).collect()
        };
        for controller in live {
            f(controller.as_ref());
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Enter the connected state, notifying controllers. Idempotent.
    pub fn connect(&self) {
        if self.inner.connected.replace(true) {
            return;
        }
        debug!("host connected");
        self.notify(|c| c.host_connected());
    }

    /// Leave the connected state, notifying controllers. Idempotent.
    pub fn disconnect(&self) {
        if !self.inner.connected.replace(false) {
            return;
        }
        debug!("host disconnected");
        self.notify(|c| c.host_disconnected());
    }

    /// Whether the host is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.get()
    }

    // ── Update scheduling ────────────────────────────────────────────

    /// Request a future update cycle. Requests coalesce: any number of
    /// calls between cycles leave at most one cycle pending.
    pub fn request_update(&self) {
        self.inner
            .update_requests
            .set(self.inner.update_requests.get() + 1);
        if !self.inner.update_pending.replace(true) {
            trace!("update cycle scheduled");
        }
    }

    /// Run one pending update cycle, delivering `host_update` to every
    /// live controller before the host's own output would be recomputed.
    ///
    /// Returns `false` (and delivers nothing) when no update is pending.
    /// The pending flag is cleared before delivery, so a `request_update`
    /// from inside the cycle schedules a fresh one.
    pub fn run_update(&self) -> bool {
        if !self.inner.update_pending.replace(false) {
            return false;
        }
        self.inner.update_cycles.set(self.inner.update_cycles.get() + 1);
        trace!("update cycle running");
        self.notify(|c| c.host_update());
        true
    }

    /// Whether an update cycle is currently pending.
    #[must_use]
    pub fn is_update_pending(&self) -> bool {
        self.inner.update_pending.get()
    }

    /// Total `request_update` calls observed (coalesced requests included).
    #[must_use]
    pub fn update_requests_total(&self) -> u64 {
        self.inner.update_requests.get()
    }

    /// Total update cycles run.
    #[must_use]
    pub fn update_cycles_total(&self) -> u64 {
        self.inner.update_cycles.get()
    }

    // ── State access ─────────────────────────────────────────────────

    /// Read the component state.
    ///
    /// # Panics
    ///
    /// Panics on re-entrant access while the state is mutably borrowed;
    /// use [`try_with_state`](Host::try_with_state) where that can occur.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Mutate the component state and request an update cycle, mirroring
    /// a reactive property write.
    ///
    /// # Panics
    ///
    /// Panics on re-entrant access; use [`try_update_state`](Host::try_update_state).
    pub fn update_state<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(&mut self.inner.state.borrow_mut());
        self.request_update();
        result
    }

    /// Fallible variant of [`with_state`](Host::with_state).
    pub fn try_with_state<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R, HostError> {
        let state = self
            .inner
            .state
            .try_borrow()
            .map_err(|_| HostError::ReentrantStateAccess)?;
        Ok(f(&state))
    }

    /// Fallible variant of [`update_state`](Host::update_state).
    pub fn try_update_state<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R, HostError> {
        let result = {
            let mut state = self
                .inner
                .state
                .try_borrow_mut()
                .map_err(|_| HostError::ReentrantStateAccess)?;
            f(&mut state)
        };
        self.request_update();
        Ok(result)
    }

    // ── Content area ─────────────────────────────────────────────────

    /// Declare a slot in the host's rendered output (`None` for the
    /// default slot). If already-projected children map to the new slot,
    /// a slot-change signal fires for it.
    pub fn declare_slot(&self, name: Option<&str>) {
        let fired = {
            let mut content = self.inner.content.borrow_mut();
            match content.declare(name) {
                Some(canonical) if content.has_children_for(&canonical) => Some(canonical),
                _ => None,
            }
        };
        if let Some(canonical) = fired {
            self.inner.slot_signal.emit(&canonical);
        }
    }

    /// Project a child into the host. If its target slot is declared, a
    /// slot-change signal fires for that slot; otherwise the child is
    /// retained but inert.
    pub fn append_child(&self, node: Node) {
        let assigned = self.inner.content.borrow_mut().append(node);
        if let Some(canonical) = assigned {
            self.inner.slot_signal.emit(&canonical);
        }
    }

    /// Nodes currently assigned to the named (or default) slot, or `None`
    /// if the host's output declares no such slot.
    #[must_use]
    pub fn assigned_nodes(&self, slot_name: Option<&str>) -> Option<Vec<Node>> {
        self.inner.content.borrow().assigned_nodes(slot_name)
    }

    /// Element children currently assigned to the named (or default)
    /// slot, or `None` if no such slot is declared.
    #[must_use]
    pub fn assigned_elements(&self, slot_name: Option<&str>) -> Option<Vec<Element>> {
        self.inner.content.borrow().assigned_elements(slot_name)
    }

    /// Subscribe to slot-change signals scoped to this host's content
    /// area. The callback receives the changed slot's name (empty string
    /// for the default slot).
    pub fn on_slot_change(&self, callback: impl Fn(&str) + 'static) -> Subscription {
        self.inner.slot_signal.subscribe(callback)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
