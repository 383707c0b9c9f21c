//! Property-based invariant tests for the memoization controller.
//!
//! These tests drive a memo through random sequences of state writes,
//! update cycles, and reads, checking against a straight-line reference
//! model:
//!
//! 1. The returned value always matches the reference model's cache.
//! 2. The dependency provider runs exactly once per stale read.
//! 3. The compute function runs only when dependencies actually changed.
//! 4. `recompute_count` tracks successful computations exactly.
//! 5. `shallow_eq` is reflexive, symmetric, and order-sensitive.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use tether_controllers::MemoController;
use tether_controllers::array::shallow_eq;
use tether_host::Host;

#[derive(Debug, Clone)]
enum Op {
    /// Write the reactive property (schedules a cycle).
    Set(u8),
    /// Run one pending update cycle, if any.
    Cycle,
    /// Plain read.
    Read,
    /// Read with forced dependency re-check.
    ForceRead,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::Set),
        Just(Op::Cycle),
        Just(Op::Read),
        Just(Op::ForceRead),
    ]
}

/// Straight-line model of the memo protocol.
#[derive(Default)]
struct Model {
    prop: u8,
    pending: bool,
    stale: bool,
    last_deps: Option<Vec<u8>>,
    cached: Option<u32>,
    deps_calls: u32,
    compute_calls: u32,
}

impl Model {
    fn new() -> Self {
        Self {
            stale: true,
            ..Self::default()
        }
    }

    fn read(&mut self, force: bool) -> u32 {
        if force {
            self.stale = true;
        }
        if self.stale {
            self.deps_calls += 1;
            let deps = vec![self.prop];
            let unchanged = self
                .last_deps
                .as_ref()
                .is_some_and(|last| shallow_eq(last, &deps));
            if !unchanged {
                self.compute_calls += 1;
                self.cached = Some(u32::from(self.prop) * 2);
                self.last_deps = Some(deps);
            }
            self.stale = false;
        }
        self.cached.expect("model computes on first read")
    }
}

proptest! {
    #[test]
    fn memo_matches_reference_model(ops in proptest::collection::vec(op_strategy(), 1..64)) {
        let host = Host::new(0u8);
        let deps_calls = Rc::new(Cell::new(0u32));
        let compute_calls = Rc::new(Cell::new(0u32));

        let dc = Rc::clone(&deps_calls);
        let cc = Rc::clone(&compute_calls);
        let memo = MemoController::new(
            &host,
            move |prop: &u8, _deps: &[u8]| {
                cc.set(cc.get() + 1);
                u32::from(*prop) * 2
            },
            move |prop: &u8| {
                dc.set(dc.get() + 1);
                vec![*prop]
            },
        );

        let mut model = Model::new();

        for op in ops {
            match op {
                Op::Set(v) => {
                    host.update_state(|prop| *prop = v);
                    model.prop = v;
                    model.pending = true;
                }
                Op::Cycle => {
                    let ran = host.run_update();
                    prop_assert_eq!(ran, model.pending);
                    if model.pending {
                        model.stale = true;
                        model.pending = false;
                    }
                }
                Op::Read | Op::ForceRead => {
                    let force = matches!(op, Op::ForceRead);
                    let expected = model.read(force);
                    prop_assert_eq!(memo.get_value(force), expected);
                }
            }
            prop_assert_eq!(deps_calls.get(), model.deps_calls);
            prop_assert_eq!(compute_calls.get(), model.compute_calls);
            prop_assert_eq!(memo.recompute_count(), u64::from(model.compute_calls));
        }
    }

    #[test]
    fn shallow_eq_reflexive(v in proptest::collection::vec(any::<i32>(), 0..16)) {
        prop_assert!(shallow_eq(&v, &v));
    }

    #[test]
    fn shallow_eq_symmetric(
        a in proptest::collection::vec(any::<i32>(), 0..16),
        b in proptest::collection::vec(any::<i32>(), 0..16),
    ) {
        prop_assert_eq!(shallow_eq(&a, &b), shallow_eq(&b, &a));
    }

    #[test]
    fn shallow_eq_detects_single_element_change(
        v in proptest::collection::vec(any::<i32>(), 1..16),
        idx in any::<prop::sample::Index>(),
    ) {
        let i = idx.index(v.len());
        let mut changed = v.clone();
        changed[i] = changed[i].wrapping_add(1);
        prop_assert!(!shallow_eq(&v, &changed));
    }

    #[test]
    fn shallow_eq_rejects_length_mismatch(
        v in proptest::collection::vec(any::<i32>(), 0..16),
        extra in any::<i32>(),
    ) {
        let mut longer = v.clone();
        longer.push(extra);
        prop_assert!(!shallow_eq(&v, &longer));
    }
}
