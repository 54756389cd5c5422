//! Core value and error types shared by the runtime components.
//!
//! - [`Value`] - the untyped payload a promise settles with
//! - [`JsError`] - an error with a kind and message
//! - [`ErrorKind`] - kinds of errors
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, JsError, Value};
//!
//! let num = Value::from(42);
//! assert_eq!(num, Value::Smi(42));
//!
//! let reason = Value::from(JsError::new(ErrorKind::TypeError, "not callable"));
//! assert_eq!(reason.to_string(), "TypeError: not callable");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod value;

pub use error::{ErrorKind, JsError};
pub use value::Value;
