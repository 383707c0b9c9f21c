#![forbid(unsafe_code)]

//! Filtered observation of a host's slotted content.
//!
//! # Design
//!
//! [`SlotController<S>`] watches the host's content area for
//! slot-composition changes and requests a host update when a relevant
//! slot changes — every slot if constructed unfiltered, otherwise only
//! slots in its watched-name set. The signal subscription is held as an
//! RAII guard: established on `host_connected`, dropped on
//! `host_disconnected`, re-established on reconnect.
//!
//! The default slot's name is the empty string; a name filter therefore
//! never matches the default slot.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashSet;
use tether_host::{Controller, Element, Host, Node, Subscription};

#[cfg(feature = "tracing")]
use tracing::debug;

struct SlotInner<S> {
    host: Host<S>,
    /// `None` observes every slot.
    watched: Option<AHashSet<String>>,
    subscription: RefCell<Option<Subscription>>,
}

/// A controller that observes slotted content and requests a host update
/// when a watched slot's composition changes.
///
/// Dropping the controller detaches it from its host and cancels any
/// active subscription.
pub struct SlotController<S> {
    inner: Rc<SlotInner<S>>,
}

impl<S: 'static> Controller for SlotInner<S> {
    fn host_connected(&self) {
        let host = self.host.clone();
        let watched = self.watched.clone();
        let subscription = self.host.on_slot_change(move |slot_name| {
            if watched.as_ref().is_none_or(|set| set.contains(slot_name)) {
                host.request_update();
            }
        });
        #[cfg(feature = "tracing")]
        debug!("slot observation active");
        *self.subscription.borrow_mut() = Some(subscription);
    }

    fn host_disconnected(&self) {
        #[cfg(feature = "tracing")]
        debug!("slot observation cancelled");
        self.subscription.borrow_mut().take();
    }
}

impl<S: 'static> SlotController<S> {
    /// Create a controller observing every slot in the host's output,
    /// including slots declared later.
    pub fn new(host: &Host<S>) -> Self {
        Self::build(host, None)
    }

    /// Create a controller observing only the named slots.
    pub fn watching<I, N>(host: &Host<S>, slot_names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let watched = slot_names.into_iter().map(Into::into).collect();
        Self::build(host, Some(watched))
    }

    fn build(host: &Host<S>, watched: Option<AHashSet<String>>) -> Self {
        let inner = Rc::new(SlotInner {
            host: host.clone(),
            watched,
            subscription: RefCell::new(None),
        });
        let controller: Rc<dyn Controller> = inner.clone();
        host.attach(&controller);
        Self { inner }
    }

    /// Nodes currently assigned to the named (or default) slot, or `None`
    /// if the host's output declares no such slot.
    #[must_use]
    pub fn assigned_nodes(&self, slot_name: Option<&str>) -> Option<Vec<Node>> {
        self.inner.host.assigned_nodes(slot_name)
    }

    /// Element children currently assigned to the named (or default)
    /// slot, or `None` if no such slot is declared.
    #[must_use]
    pub fn assigned_elements(&self, slot_name: Option<&str>) -> Option<Vec<Element>> {
        self.inner.host.assigned_elements(slot_name)
    }

    /// Whether the named (or default) slot has any assigned nodes.
    #[must_use]
    pub fn has_assigned_nodes(&self, slot_name: Option<&str>) -> bool {
        self.assigned_nodes(slot_name)
            .is_some_and(|nodes| !nodes.is_empty())
    }

    /// Whether the named (or default) slot has any assigned elements.
    #[must_use]
    pub fn has_assigned_elements(&self, slot_name: Option<&str>) -> bool {
        self.assigned_elements(slot_name)
            .is_some_and(|elements| !elements.is_empty())
    }
}

impl<S> std::fmt::Debug for SlotController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotController")
            .field("watched", &self.inner.watched)
            .field(
                "subscribed",
                &self.inner.subscription.borrow().is_some(),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
