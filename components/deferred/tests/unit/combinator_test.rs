//! Unit tests for resolve/reject/all/race

use super::support::{delayed_fulfill, delayed_reject, observe};
use core_types::Value;
use deferred::{EventLoop, Promise, PromiseState};

#[test]
fn resolve_plain_value_fulfills() {
    let event_loop = EventLoop::new();
    let promise = Promise::resolve(&event_loop, Value::from("plain"));
    let seen = observe(&promise);
    event_loop.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), Some(Ok(Value::from("plain"))));
}

#[test]
fn resolve_adopts_rejection() {
    let event_loop = EventLoop::new();
    let rejected = Promise::reject(&event_loop, Value::from("no"));
    let adopted = Promise::resolve(&event_loop, rejected.clone().into());
    assert!(!adopted.ptr_eq(&rejected));

    let seen = observe(&adopted);
    event_loop.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), Some(Err(Value::from("no"))));
}

#[test]
fn reject_keeps_promise_reason_verbatim() {
    let event_loop = EventLoop::new();
    let inner = Promise::resolve(&event_loop, Value::Smi(1));
    let reason: Value = inner.into();
    let seen = observe(&Promise::reject(&event_loop, reason.clone()));
    event_loop.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), Some(Err(reason)));
}

#[test]
fn all_preserves_input_order_not_completion_order() {
    let event_loop = EventLoop::new();
    let items = vec![
        delayed_fulfill(&event_loop, 30, Value::from("slow")).into(),
        delayed_fulfill(&event_loop, 10, Value::from("fast")).into(),
        Value::from("now"),
    ];
    let seen = observe(&Promise::all(&event_loop, items));
    event_loop.run_until_done().unwrap();

    assert_eq!(
        *seen.borrow(),
        Some(Ok(Value::Array(vec![
            Value::from("slow"),
            Value::from("fast"),
            Value::from("now"),
        ])))
    );
}

#[test]
fn all_rejects_with_first_rejection() {
    let event_loop = EventLoop::new();
    let items = vec![
        delayed_reject(&event_loop, 20, Value::from("second")).into(),
        delayed_reject(&event_loop, 5, Value::from("first")).into(),
        delayed_fulfill(&event_loop, 1, Value::Smi(1)).into(),
    ];
    let all = Promise::all(&event_loop, items);
    let seen = observe(&all);
    event_loop.run_until_done().unwrap();

    assert_eq!(*seen.borrow(), Some(Err(Value::from("first"))));
    assert_eq!(all.state(), PromiseState::Rejected);
}

#[test]
fn all_settles_before_stragglers() {
    let event_loop = EventLoop::new();
    let items = vec![
        Promise::reject(&event_loop, Value::from("early")).into(),
        delayed_fulfill(&event_loop, 100, Value::Smi(1)).into(),
    ];
    let all = Promise::all(&event_loop, items);
    event_loop.run_all_microtasks().unwrap();
    assert_eq!(all.state(), PromiseState::Rejected);
    assert_eq!(event_loop.pending_timers(), 1);
}

#[test]
fn all_of_nothing_is_an_empty_array() {
    let event_loop = EventLoop::new();
    let seen = observe(&Promise::all(&event_loop, vec![]));
    event_loop.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), Some(Ok(Value::Array(vec![]))));
}

#[test]
fn race_takes_earliest_settlement() {
    let event_loop = EventLoop::new();
    let items = vec![
        delayed_fulfill(&event_loop, 50, Value::from("a")).into(),
        delayed_reject(&event_loop, 10, Value::from("b")).into(),
    ];
    let seen = observe(&Promise::race(&event_loop, items));
    event_loop.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), Some(Err(Value::from("b"))));
}

#[test]
fn race_with_plain_value_wins_over_pending() {
    let event_loop = EventLoop::new();
    let items = vec![
        delayed_fulfill(&event_loop, 1, Value::from("timer")).into(),
        Value::Smi(7),
    ];
    let seen = observe(&Promise::race(&event_loop, items));
    event_loop.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), Some(Ok(Value::Smi(7))));
}
