//! Static factories and combinators.
//!
//! These only use the public `then` contract of the promises they consume.

use crate::event_loop::EventLoop;
use crate::promise::{Handler, Promise, RejectFn, ResolveFn};
use core_types::Value;
use std::cell::RefCell;
use std::rc::Rc;

fn forward_fulfilled(resolve: ResolveFn) -> Handler {
    Handler::new(move |value| {
        resolve.call(value);
        Ok(Value::Undefined)
    })
}

fn forward_rejected(reject: RejectFn) -> Handler {
    Handler::new(move |reason| {
        reject.call(reason);
        Ok(Value::Undefined)
    })
}

struct AllSlots {
    values: Vec<Value>,
    remaining: usize,
}

impl Promise {
    /// Returns a promise for `value`.
    ///
    /// A promise is adopted: the result settles however `value` settles.
    /// Anything else fulfills the result immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use deferred::{EventLoop, Promise, PromiseState};
    ///
    /// let event_loop = EventLoop::new();
    /// let plain = Promise::resolve(&event_loop, Value::from("a"));
    /// assert_eq!(plain.state(), PromiseState::Fulfilled);
    ///
    /// let adopted = Promise::resolve(&event_loop, plain.into());
    /// assert_eq!(adopted.state(), PromiseState::Pending);
    /// event_loop.run_until_done().unwrap();
    /// assert_eq!(adopted.state(), PromiseState::Fulfilled);
    /// ```
    pub fn resolve(host: &EventLoop, value: Value) -> Promise {
        Promise::new(host, |resolve, reject| {
            match Promise::from_value(&value) {
                Some(inner) => {
                    inner.then(
                        Some(forward_fulfilled(resolve)),
                        Some(forward_rejected(reject)),
                    );
                }
                None => resolve.call(value),
            }
            Ok(())
        })
    }

    /// Returns a promise rejected with `reason`, used verbatim.
    pub fn reject(host: &EventLoop, reason: Value) -> Promise {
        Promise::new(host, |_, reject| {
            reject.call(reason);
            Ok(())
        })
    }

    /// Waits for every item and fulfills with their values in input order.
    ///
    /// Items may be plain values or promises. The first rejection rejects the
    /// result; later outcomes are ignored. An empty input fulfills with an
    /// empty array.
    ///
    /// # Arguments
    ///
    /// * `host` - The event loop the combined promise dispatches on
    /// * `items` - Plain values or wrapped promises, in result order
    ///
    /// # Returns
    ///
    /// A promise for a [`Value::Array`] with one entry per item.
    pub fn all(host: &EventLoop, items: Vec<Value>) -> Promise {
        Promise::new(host, |resolve, reject| {
            let total = items.len();
            if total == 0 {
                resolve.call(Value::Array(Vec::new()));
                return Ok(());
            }

            let slots = Rc::new(RefCell::new(AllSlots {
                values: vec![Value::Undefined; total],
                remaining: total,
            }));
            for (index, item) in items.into_iter().enumerate() {
                let slots = slots.clone();
                let resolve = resolve.clone();
                let on_fulfilled = Handler::new(move |value| {
                    let finished = {
                        let mut slots = slots.borrow_mut();
                        slots.values[index] = value;
                        slots.remaining -= 1;
                        (slots.remaining == 0).then(|| std::mem::take(&mut slots.values))
                    };
                    if let Some(values) = finished {
                        resolve.call(Value::Array(values));
                    }
                    Ok(Value::Undefined)
                });
                Promise::resolve(host, item)
                    .then(Some(on_fulfilled), Some(forward_rejected(reject.clone())));
            }
            Ok(())
        })
    }

    /// Settles like whichever item settles first.
    ///
    /// An empty input never settles.
    ///
    /// # Arguments
    ///
    /// * `items` - Plain values or wrapped promises
    pub fn race(host: &EventLoop, items: Vec<Value>) -> Promise {
        Promise::new(host, |resolve, reject| {
            for item in items {
                Promise::resolve(host, item).then(
                    Some(forward_fulfilled(resolve.clone())),
                    Some(forward_rejected(reject.clone())),
                );
            }
            Ok(())
        })
    }
}
