//! What a continuation's outcome means for the promise `then` returned.
//!
//! 1. A thrown value rejects the derived promise.
//! 2. A returned promise is adopted: the derived promise settles the same way
//!    once it does.
//! 3. Any other returned value fulfills the derived promise.

use crate::promise::{Promise, RejectFn, ResolveFn};
use crate::reaction::Reaction;
use core_types::{JsError, Value};

/// Settles the derived promise behind `resolve`/`reject` from a handler's
/// outcome.
pub(crate) fn settle_with(outcome: Result<Value, Value>, resolve: &ResolveFn, reject: &RejectFn) {
    let value = match outcome {
        Ok(value) => value,
        Err(thrown) => return reject.call(thrown),
    };

    match Promise::from_value(&value) {
        // A promise that waits on itself would never settle.
        Some(inner) if inner.ptr_eq(resolve.target()) => reject.call(
            JsError::type_error("chaining cycle detected for promise").into(),
        ),
        Some(inner) => adopt(&inner, resolve.clone(), reject.clone()),
        None => resolve.call(value),
    }
}

/// Mirrors `inner`'s eventual outcome onto the derived promise.
fn adopt(inner: &Promise, resolve: ResolveFn, reject: RejectFn) {
    tracing::trace!(inner = inner.id(), "adopting returned promise");
    inner.subscribe(Reaction::new(
        move |value| resolve.call(value),
        move |reason| reject.call(reason),
    ));
}
