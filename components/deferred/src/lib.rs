//! Deferred values on a single-threaded cooperative event loop.
//!
//! - [`Promise`] - a value that settles once, with `then`/`catch` chaining and
//!   the `resolve`/`reject`/`all`/`race` factories
//! - [`EventLoop`] - the host loop promises defer their callbacks to, with
//!   task, microtask and virtual-time timer queues
//! - [`EventLoopConfig`] - limits and initial clock for an event loop
//!
//! # Examples
//!
//! ```
//! use core_types::Value;
//! use deferred::{EventLoop, Handler, Promise, Task};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let event_loop = EventLoop::new();
//!
//! let (slow, finish, _) = Promise::with_resolvers(&event_loop);
//! event_loop.set_timeout(50, Task::new(move || {
//!     finish.call(Value::from("slow"));
//!     Ok(())
//! }));
//!
//! let result = Rc::new(RefCell::new(Value::Undefined));
//! let sink = result.clone();
//! Promise::all(&event_loop, vec![Value::Smi(1), slow.into()]).then(
//!     Some(Handler::new(move |values| {
//!         *sink.borrow_mut() = values;
//!         Ok(Value::Undefined)
//!     })),
//!     None,
//! );
//!
//! event_loop.run_until_done().unwrap();
//! assert_eq!(result.borrow().to_string(), "1,slow");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod combinators;
pub mod config;
pub mod error;
pub mod event_loop;
pub mod promise;
mod reaction;
mod resolution;
pub mod task_queue;

// Re-export main types at crate root
pub use config::EventLoopConfig;
pub use error::{RuntimeError, RuntimeResult};
pub use event_loop::EventLoop;
pub use promise::{Handler, Promise, PromiseState, RejectFn, ResolveFn};
pub use task_queue::{MicroTask, MicrotaskQueue, Task, TaskQueue, TimerId, TimerQueue};
