//! Host-level failures of the event loop.
//!
//! Promise rejections never show up here; they stay in-band as values.

use core_types::JsError;
use thiserror::Error;

/// Errors returned by [`EventLoop`](crate::EventLoop) operations.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A host task returned an error.
    #[error("task failed: {0}")]
    TaskFailed(#[from] JsError),

    /// A single microtask drain ran more jobs than the configured budget.
    #[error("microtask budget of {limit} exceeded in a single drain")]
    MicrotaskBudgetExceeded {
        /// The configured budget
        limit: usize,
    },

    /// `run_until_done` ran more turns than the configured limit.
    #[error("event loop exceeded {limit} turns")]
    TurnLimitExceeded {
        /// The configured limit
        limit: usize,
    },

    /// Configuration text could not be parsed.
    #[error("invalid event loop configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// Result type for event loop operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
