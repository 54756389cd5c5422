//! Unit tests for Promise settlement

use super::support::{init_tracing, observe};
use core_types::{JsError, Value};
use deferred::{EventLoop, Promise, PromiseState};

#[test]
fn new_promise_is_pending() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop, |_, _| Ok(()));
    assert_eq!(promise.state(), PromiseState::Pending);
}

#[test]
fn resolve_changes_state_to_fulfilled() {
    let event_loop = EventLoop::new();
    let (promise, resolve, _) = Promise::with_resolvers(&event_loop);
    resolve.call(Value::Smi(42));
    assert_eq!(promise.state(), PromiseState::Fulfilled);
}

#[test]
fn reject_changes_state_to_rejected() {
    let event_loop = EventLoop::new();
    let (promise, _, reject) = Promise::with_resolvers(&event_loop);
    reject.call(JsError::type_error("test").into());
    assert_eq!(promise.state(), PromiseState::Rejected);
}

#[test]
fn cannot_resolve_already_fulfilled_promise() {
    init_tracing();
    let event_loop = EventLoop::new();
    let (promise, resolve, _) = Promise::with_resolvers(&event_loop);
    resolve.call(Value::Smi(42));
    resolve.call(Value::Smi(100));

    let seen = observe(&promise);
    event_loop.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), Some(Ok(Value::Smi(42))));
}

#[test]
fn cannot_reject_already_fulfilled_promise() {
    let event_loop = EventLoop::new();
    let (promise, resolve, reject) = Promise::with_resolvers(&event_loop);
    resolve.call(Value::Smi(42));
    reject.call(Value::from("ignored"));
    assert_eq!(promise.state(), PromiseState::Fulfilled);
}

#[test]
fn cannot_resolve_already_rejected_promise() {
    let event_loop = EventLoop::new();
    let (promise, resolve, reject) = Promise::with_resolvers(&event_loop);
    reject.call(Value::from("first"));
    resolve.call(Value::Smi(42));

    let seen = observe(&promise);
    event_loop.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), Some(Err(Value::from("first"))));
}

#[test]
fn resolvers_can_settle_from_a_later_task() {
    let event_loop = EventLoop::new();
    let mut stash = None;
    let promise = Promise::new(&event_loop, |resolve, _| {
        stash = Some(resolve);
        Ok(())
    });
    assert_eq!(promise.state(), PromiseState::Pending);

    let resolve = stash.expect("executor ran synchronously");
    event_loop.enqueue_task(deferred::Task::new(move || {
        resolve.call(Value::Null);
        Ok(())
    }));
    event_loop.run_until_done().unwrap();
    assert_eq!(promise.state(), PromiseState::Fulfilled);
}

#[test]
fn executor_error_becomes_rejection_reason() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop, |_, _| {
        Err(JsError::type_error("out of range").into())
    });
    let seen = observe(&promise);
    event_loop.run_until_done().unwrap();

    assert_eq!(
        *seen.borrow(),
        Some(Err(Value::from(JsError::type_error("out of range"))))
    );
}

#[test]
fn reasons_can_be_any_value() {
    let event_loop = EventLoop::new();
    let reason = Value::Array(vec![Value::Smi(1), Value::Boolean(false)]);
    let promise = Promise::reject(&event_loop, reason.clone());
    let seen = observe(&promise);
    event_loop.run_until_done().unwrap();
    assert_eq!(*seen.borrow(), Some(Err(reason)));
}

#[test]
fn resolve_with_each_primitive() {
    let event_loop = EventLoop::new();
    for value in [
        Value::Undefined,
        Value::Null,
        Value::Boolean(true),
        Value::Double(3.5),
        Value::from("text"),
    ] {
        let seen = observe(&Promise::resolve(&event_loop, value.clone()));
        event_loop.run_until_done().unwrap();
        assert_eq!(*seen.borrow(), Some(Ok(value)));
    }
}

#[test]
fn debug_output_names_outcome() {
    let event_loop = EventLoop::new();
    let promise = Promise::resolve(&event_loop, Value::Smi(1));
    let text = format!("{:?}", promise);
    assert!(text.contains("Fulfilled"), "{text}");
}
