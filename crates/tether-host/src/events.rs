#![forbid(unsafe_code)]

//! Slot-change signal plumbing: a subscriber registry and its RAII guard.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 3. A subscription outliving its signal becomes inert (drop is a no-op).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type SlotCallback = Rc<dyn Fn(&str)>;

/// Registry of slot-change subscribers, scoped to one host's content area.
pub(crate) struct SlotSignal {
    subscribers: RefCell<Vec<(u64, SlotCallback)>>,
    next_id: Cell<u64>,
}

impl SlotSignal {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Register a callback; the returned guard unsubscribes on drop.
    pub(crate) fn subscribe(self: &Rc<Self>, callback: impl Fn(&str) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        Subscription {
            signal: Rc::downgrade(self),
            id,
        }
    }

    /// Notify all current subscribers of a change to the named slot.
    ///
    /// The subscriber list is snapshotted first so a callback may subscribe
    /// or unsubscribe without invalidating the iteration.
    pub(crate) fn emit(&self, slot_name: &str) {
        let snapshot: Vec<SlotCallback> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in snapshot {
            callback(slot_name);
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

/// RAII guard for a slot-change subscription.
///
/// Unsubscribes unconditionally on drop, regardless of how the owning
/// scope unwinds.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    signal: Weak<SlotSignal>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.subscribers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
