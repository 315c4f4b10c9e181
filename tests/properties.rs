//! Property tests for store invariants.

use proptest::prelude::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tincan_redux::Store;

#[derive(Clone, Debug, PartialEq)]
struct CounterState {
    counter: i64,
    step_size: i64,
}

#[derive(Clone, Debug)]
enum CounterAction {
    UpdateCounter(i64),
    ChangeStepSize(i64),
    Unknown(String),
}

fn reducer(state: &CounterState, action: &CounterAction) -> CounterState {
    match action {
        CounterAction::UpdateCounter(delta) => CounterState {
            counter: state.counter.saturating_add(*delta),
            ..state.clone()
        },
        CounterAction::ChangeStepSize(step_size) => CounterState {
            step_size: *step_size,
            ..state.clone()
        },
        CounterAction::Unknown(_) => state.clone(),
    }
}

fn action() -> impl Strategy<Value = CounterAction> {
    prop_oneof![
        (-1000i64..1000).prop_map(CounterAction::UpdateCounter),
        (1i64..=5).prop_map(CounterAction::ChangeStepSize),
        "[A-Z_]{1,12}".prop_map(CounterAction::Unknown),
    ]
}

fn initial() -> impl Strategy<Value = CounterState> {
    (-1000i64..1000, 1i64..=5).prop_map(|(counter, step_size)| CounterState { counter, step_size })
}

proptest! {
    #[test]
    fn store_is_fold_of_reducer(start in initial(), actions in prop::collection::vec(action(), 0..50)) {
        let store = Store::new(reducer, start.clone());
        for a in &actions {
            store.dispatch(a.clone());
        }
        let expected = actions.iter().fold(start, |state, a| reducer(&state, a));
        prop_assert_eq!(&*store.get_state(), &expected);
    }

    #[test]
    fn unknown_kind_never_changes_state(start in initial(), kind in "[A-Z_]{1,12}") {
        let store = Store::new(reducer, start.clone());
        store.dispatch(CounterAction::Unknown(kind));
        prop_assert_eq!(&*store.get_state(), &start);
    }

    #[test]
    fn live_listener_count(n in 0usize..20, m_seed in 0usize..20) {
        let m = m_seed.min(n);
        let store = Store::new(reducer, CounterState { counter: 0, step_size: 1 });
        let calls = Arc::new(AtomicUsize::new(0));

        let mut subs: Vec<_> = (0..n)
            .map(|_| {
                let calls = calls.clone();
                store.subscribe(move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();
        for sub in subs.drain(..m) {
            sub.unsubscribe();
        }

        store.dispatch(CounterAction::UpdateCounter(1));
        prop_assert_eq!(calls.load(Ordering::SeqCst), n - m);
        prop_assert_eq!(store.subscriber_count(), n - m);
    }

    #[test]
    fn listeners_observe_post_dispatch_state(actions in prop::collection::vec(action(), 1..20)) {
        let store = Store::new(reducer, CounterState { counter: 0, step_size: 1 });
        let mismatches = Arc::new(AtomicUsize::new(0));
        let expected = Arc::new(parking_lot::Mutex::new(store.get_state()));

        let _sub = store.subscribe({
            let store = store.clone();
            let mismatches = mismatches.clone();
            let expected = expected.clone();
            move || {
                if *store.get_state() != **expected.lock() {
                    mismatches.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        for a in actions {
            let next = reducer(&store.get_state(), &a);
            *expected.lock() = Arc::new(next);
            store.dispatch(a);
        }
        prop_assert_eq!(mismatches.load(Ordering::SeqCst), 0);
    }
}
