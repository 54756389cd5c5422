//! Deferred values.
//!
//! A [`Promise`] settles exactly once, to a fulfillment value or a rejection
//! reason. Continuations registered with [`Promise::then`] always run on a
//! later turn of the owning [`EventLoop`], never inside the registering call.

use crate::event_loop::EventLoop;
use crate::reaction::{Outcome, Reaction, ReactionLedger};
use crate::resolution;
use core_types::Value;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// The state of a Promise.
///
/// Once settled (Fulfilled or Rejected), a Promise cannot change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// The initial state; the promise is neither fulfilled nor rejected.
    Pending,
    /// The promise has been fulfilled with a value.
    Fulfilled,
    /// The promise has been rejected with a reason.
    Rejected,
}

impl PromiseState {
    /// Returns true if the promise is no longer pending.
    pub fn is_settled(&self) -> bool {
        !matches!(self, PromiseState::Pending)
    }
}

impl fmt::Display for PromiseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromiseState::Pending => f.write_str("pending"),
            PromiseState::Fulfilled => f.write_str("fulfilled"),
            PromiseState::Rejected => f.write_str("rejected"),
        }
    }
}

/// A continuation passed to [`Promise::then`] or [`Promise::catch`].
///
/// `Ok` is a returned value; `Err` is a thrown value and rejects the derived
/// promise.
pub struct Handler {
    callback: Box<dyn FnOnce(Value) -> Result<Value, Value>>,
}

impl Handler {
    /// Creates a new Handler from a closure.
    ///
    /// # Arguments
    ///
    /// * `f` - Receives the settled value; returns `Ok` to continue or `Err` to throw
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Value) -> Result<Value, Value> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Calls the handler with the settled value.
    pub fn call(self, value: Value) -> Result<Value, Value> {
        (self.callback)(value)
    }

    /// Passes the value through unchanged.
    pub fn identity() -> Self {
        Self::new(Ok)
    }

    /// Re-throws the reason, so rejections flow to the next link.
    pub fn rethrow() -> Self {
        Self::new(Err)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler {{ ... }}")
    }
}

/// Fulfills the promise it was created for. Calls after settlement are
/// ignored.
#[derive(Debug, Clone)]
pub struct ResolveFn {
    promise: Promise,
}

impl ResolveFn {
    /// Fulfills with `value`.
    ///
    /// `value` is stored as-is, even when it is itself a promise; adoption
    /// only happens for values returned from continuations and for
    /// [`Promise::resolve`].
    pub fn call(&self, value: Value) {
        self.promise.settle(Outcome::Fulfilled(value));
    }

    pub(crate) fn target(&self) -> &Promise {
        &self.promise
    }
}

/// Rejects the promise it was created for. Calls after settlement are
/// ignored.
#[derive(Debug, Clone)]
pub struct RejectFn {
    promise: Promise,
}

impl RejectFn {
    /// Rejects with `reason`.
    pub fn call(&self, reason: Value) {
        self.promise.settle(Outcome::Rejected(reason));
    }
}

struct PromiseInner {
    id: u64,
    host: EventLoop,
    outcome: Option<Outcome>,
    ledger: ReactionLedger,
    // Live `Value` wrapper, so repeated conversions share one identity.
    wrapper: Option<Weak<RefCell<dyn Any>>>,
}

/// A deferred value.
///
/// `Promise` is a handle; clones refer to the same underlying state. Its
/// status and result are private and change only through the [`ResolveFn`]
/// and [`RejectFn`] handed to the executor.
///
/// # Examples
///
/// ```
/// use core_types::Value;
/// use deferred::{EventLoop, Handler, Promise};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let event_loop = EventLoop::new();
/// let seen = Rc::new(RefCell::new(None));
///
/// let sink = seen.clone();
/// Promise::new(&event_loop, |resolve, _reject| {
///     resolve.call(Value::Smi(20));
///     Ok(())
/// })
/// .then(Some(Handler::new(|v| match v {
///     Value::Smi(n) => Ok(Value::Smi(n + 1)),
///     other => Err(other),
/// })), None)
/// .then(Some(Handler::new(move |v| {
///     *sink.borrow_mut() = Some(v);
///     Ok(Value::Undefined)
/// })), None);
///
/// // Nothing runs until the loop turns.
/// assert!(seen.borrow().is_none());
/// event_loop.run_until_done().unwrap();
/// assert_eq!(*seen.borrow(), Some(Value::Smi(21)));
/// ```
#[derive(Clone)]
pub struct Promise {
    inner: Rc<RefCell<PromiseInner>>,
}

impl Promise {
    /// Creates a promise and synchronously runs `executor` with its
    /// resolving functions.
    ///
    /// If the executor returns `Err(reason)`, the promise is rejected with
    /// `reason` (unless it already settled). The error is not returned to the
    /// caller.
    ///
    /// # Arguments
    ///
    /// * `host` - The event loop continuations are dispatched on
    /// * `executor` - Called once, before `new` returns, with the resolving functions
    pub fn new<F>(host: &EventLoop, executor: F) -> Self
    where
        F: FnOnce(ResolveFn, RejectFn) -> Result<(), Value>,
    {
        let (promise, resolve, reject) = Self::with_resolvers(host);
        if let Err(reason) = executor(resolve, reject.clone()) {
            tracing::trace!(promise = promise.id(), "executor threw");
            reject.call(reason);
        }
        promise
    }

    /// Creates a pending promise and hands its resolving functions to the
    /// caller.
    pub fn with_resolvers(host: &EventLoop) -> (Self, ResolveFn, RejectFn) {
        let promise = Self {
            inner: Rc::new(RefCell::new(PromiseInner {
                id: host.next_promise_id(),
                host: host.clone(),
                outcome: None,
                ledger: ReactionLedger::default(),
                wrapper: None,
            })),
        };
        let resolve = ResolveFn {
            promise: promise.clone(),
        };
        let reject = RejectFn {
            promise: promise.clone(),
        };
        (promise, resolve, reject)
    }

    /// Returns the promise wrapped in `value`, if it holds one.
    pub fn from_value(value: &Value) -> Option<Promise> {
        value.downcast_native::<Promise>()
    }

    /// Sequence number of this promise within its event loop.
    pub fn id(&self) -> u64 {
        self.inner.borrow().id
    }

    /// The event loop this promise dispatches on.
    pub fn host(&self) -> EventLoop {
        self.inner.borrow().host.clone()
    }

    /// Current state. The settled value is only observable through
    /// continuations.
    pub fn state(&self) -> PromiseState {
        match self.inner.borrow().outcome {
            None => PromiseState::Pending,
            Some(Outcome::Fulfilled(_)) => PromiseState::Fulfilled,
            Some(Outcome::Rejected(_)) => PromiseState::Rejected,
        }
    }

    /// Checks if continuations are waiting for this promise to settle.
    pub fn has_pending_reactions(&self) -> bool {
        !self.inner.borrow().ledger.is_empty()
    }

    /// Returns true if both handles refer to the same promise.
    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Registers continuations and returns the promise they settle.
    ///
    /// A missing `on_fulfilled` passes the value through; a missing
    /// `on_rejected` re-throws the reason. Whatever the chosen handler
    /// returns or throws settles the returned promise; a returned promise is
    /// adopted rather than nested.
    ///
    /// # Arguments
    ///
    /// * `on_fulfilled` - Runs with the fulfillment value
    /// * `on_rejected` - Runs with the rejection reason
    ///
    /// # Returns
    ///
    /// A new pending promise, distinct from `self`.
    pub fn then(&self, on_fulfilled: Option<Handler>, on_rejected: Option<Handler>) -> Promise {
        let on_fulfilled = on_fulfilled.unwrap_or_else(Handler::identity);
        let on_rejected = on_rejected.unwrap_or_else(Handler::rethrow);

        Promise::new(&self.host(), |resolve, reject| {
            let (resolve_after_reject, reject_after_reject) = (resolve.clone(), reject.clone());
            self.subscribe(Reaction::new(
                move |value| resolution::settle_with(on_fulfilled.call(value), &resolve, &reject),
                move |reason| {
                    resolution::settle_with(
                        on_rejected.call(reason),
                        &resolve_after_reject,
                        &reject_after_reject,
                    )
                },
            ));
            Ok(())
        })
    }

    /// Registers a rejection handler. Same as `then(None, Some(on_rejected))`.
    pub fn catch(&self, on_rejected: Handler) -> Promise {
        self.then(None, Some(on_rejected))
    }

    /// Queues `reaction` while pending; otherwise schedules it on its own.
    pub(crate) fn subscribe(&self, reaction: Reaction) {
        let (outcome, host) = {
            let mut inner = self.inner.borrow_mut();
            match inner.outcome.clone() {
                None => {
                    inner.ledger.push(reaction);
                    return;
                }
                Some(outcome) => (outcome, inner.host.clone()),
            }
        };
        tracing::trace!(promise = self.id(), "dispatching reaction on settled promise");
        host.schedule_later(move || reaction.fire(outcome));
    }

    fn settle(&self, outcome: Outcome) {
        let (id, reactions, host) = {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_some() {
                tracing::trace!(promise = inner.id, attempted = outcome.label(), "already settled");
                return;
            }
            inner.outcome = Some(outcome.clone());
            (inner.id, inner.ledger.drain(), inner.host.clone())
        };
        tracing::trace!(
            promise = id,
            outcome = outcome.label(),
            reactions = reactions.len(),
            "settled"
        );
        if reactions.is_empty() {
            return;
        }
        host.schedule_later(move || {
            for reaction in reactions {
                reaction.fire(outcome.clone());
            }
        });
    }
}

/// Wraps the promise as a [`Value::NativeObject`].
///
/// While any wrapper for a promise is alive, converting that promise again
/// returns the same object, so the two values compare equal.
impl From<Promise> for Value {
    fn from(promise: Promise) -> Self {
        let cached = promise.inner.borrow().wrapper.as_ref().and_then(Weak::upgrade);
        if let Some(object) = cached {
            return Value::NativeObject(object);
        }
        let object: Rc<RefCell<dyn Any>> = Rc::new(RefCell::new(promise.clone()));
        promise.inner.borrow_mut().wrapper = Some(Rc::downgrade(&object));
        Value::NativeObject(object)
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Promise")
                .field("id", &inner.id)
                .field("outcome", &inner.outcome)
                .field("reactions", &inner.ledger.len())
                .finish(),
            Err(_) => f.write_str("Promise { <in use> }"),
        }
    }
}
