#![forbid(unsafe_code)]

//! Lazy, dependency-checked memoization attached to a host lifecycle.
//!
//! # Design
//!
//! [`MemoController<S, T, D>`] owns a cached value and the dependency
//! array that produced it. A host update cycle only marks the value stale;
//! nothing is evaluated until the value is actually read. On a stale read
//! the dependency provider runs first, and the compute function runs only
//! when the fresh dependencies differ (ordered shallow comparison) from
//! the previous ones.
//!
//! Both user callbacks receive the host's component state as their first
//! argument, so they observe the live host at evaluation time.
//!
//! # Invariants
//!
//! 1. Neither callback runs before the first read, no matter how many
//!    update cycles pass.
//! 2. A read while fresh invokes neither callback.
//! 3. Per stale read, the dependency provider runs exactly once and the
//!    compute function at most once.
//! 4. The cached value is read only after at least one successful
//!    computation.
//!
//! # Failure Modes
//!
//! A panicking dependency provider or compute function propagates to the
//! read call site. The stale flag is cleared only after the refresh
//! decision completes, and dependencies are stored only after a successful
//! computation, so the next read retries from scratch.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tether_host::{Controller, Host};

use crate::array::shallow_eq;

#[cfg(feature = "tracing")]
use tracing::trace;

struct MemoInner<S, T, D> {
    host: Host<S>,
    deps: Box<dyn Fn(&S) -> Vec<D>>,
    compute: Box<dyn Fn(&S, &[D]) -> T>,
    last_deps: RefCell<Option<Vec<D>>>,
    cached: RefCell<Option<T>>,
    stale: Cell<bool>,
    recomputes: Cell<u64>,
}

/// A memoized value derived from host state, recomputed lazily when its
/// dependencies change.
///
/// Cloning creates a new handle to the **same** cached value. Dropping the
/// last handle detaches the controller from its host.
pub struct MemoController<S, T, D> {
    inner: Rc<MemoInner<S, T, D>>,
}

impl<S, T, D> Clone for MemoController<S, T, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, T: std::fmt::Debug, D> std::fmt::Debug for MemoController<S, T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoController")
            .field("cached", &self.inner.cached.borrow())
            .field("stale", &self.inner.stale.get())
            .field("recomputes", &self.inner.recomputes.get())
            .finish()
    }
}

impl<S, T, D> Controller for MemoInner<S, T, D> {
    fn host_update(&self) {
        // Mark only; evaluation waits for the next read.
        self.stale.set(true);
    }
}

impl<S, T, D> MemoController<S, T, D>
where
    S: 'static,
    T: Clone + 'static,
    D: PartialEq + 'static,
{
    /// Create a memo attached to `host`, initially stale.
    ///
    /// `deps` produces the ordered dependency array; `compute` maps a
    /// dependency array to the memoized value. Neither runs here.
    pub fn new(
        host: &Host<S>,
        compute: impl Fn(&S, &[D]) -> T + 'static,
        deps: impl Fn(&S) -> Vec<D> + 'static,
    ) -> Self {
        let inner = Rc::new(MemoInner {
            host: host.clone(),
            deps: Box::new(deps),
            compute: Box::new(compute),
            last_deps: RefCell::new(None),
            cached: RefCell::new(None),
            stale: Cell::new(true),
            recomputes: Cell::new(0),
        });
        let controller: Rc<dyn Controller> = inner.clone();
        host.attach(&controller);
        Self { inner }
    }

    /// The memoized value, recomputing first if stale.
    #[must_use]
    pub fn value(&self) -> T {
        if self.inner.stale.get() {
            self.inner.refresh();
        }
        self.inner.stale.set(false);
        self.inner
            .cached
            .borrow()
            .as_ref()
            .expect("cached is always Some after refresh")
            .clone()
    }

    /// The memoized value, optionally forcing a dependency re-check even
    /// if no host update occurred since the last read.
    #[must_use]
    pub fn get_value(&self, force_check_deps: bool) -> T {
        if force_check_deps {
            self.inner.stale.set(true);
        }
        self.value()
    }

    /// Whether the next read will re-check dependencies.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.inner.stale.get()
    }

    /// Total successful recomputations (diagnostics).
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.inner.recomputes.get()
    }
}

impl<S, T, D: PartialEq> MemoInner<S, T, D> {
    /// Re-evaluate dependencies and recompute the value if they changed.
    fn refresh(&self) {
        let new_deps = self.host.with_state(|state| (self.deps)(state));

        if let Some(last) = self.last_deps.borrow().as_ref() {
            if shallow_eq(last, &new_deps) {
                #[cfg(feature = "tracing")]
                trace!("memo dependencies unchanged, keeping cached value");
                return;
            }
        }

        let value = self.host.with_state(|state| (self.compute)(state, &new_deps));
        *self.last_deps.borrow_mut() = Some(new_deps);
        *self.cached.borrow_mut() = Some(value);
        self.recomputes.set(self.recomputes.get() + 1);
        #[cfg(feature = "tracing")]
        trace!(recomputes = self.recomputes.get(), "memo recomputed");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
