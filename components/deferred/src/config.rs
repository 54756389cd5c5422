//! Event loop configuration.

use crate::error::RuntimeResult;
use serde::Deserialize;

/// Limits and initial state for an [`EventLoop`](crate::EventLoop).
///
/// Every field has a default, so a partial TOML document is valid.
///
/// # Examples
///
/// ```
/// use deferred::EventLoopConfig;
///
/// let config = EventLoopConfig::from_toml_str("max_turns = 100").unwrap();
/// assert_eq!(config.max_turns, Some(100));
/// assert_eq!(config.microtask_budget, None);
/// assert_eq!(config.start_time_ms, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventLoopConfig {
    /// Maximum number of tasks `run_until_done` may execute.
    pub max_turns: Option<usize>,
    /// Maximum number of microtasks a single drain may execute.
    pub microtask_budget: Option<usize>,
    /// Initial value of the virtual clock, in milliseconds.
    pub start_time_ms: u64,
}

impl EventLoopConfig {
    /// Parses a configuration from TOML text.
    ///
    /// Missing keys take their defaults; unknown keys are an error.
    ///
    /// # Returns
    ///
    /// [`RuntimeError::InvalidConfig`] if the text does not parse.
    ///
    /// [`RuntimeError::InvalidConfig`]: crate::RuntimeError::InvalidConfig
    pub fn from_toml_str(text: &str) -> RuntimeResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Sets the turn limit.
    pub fn with_max_turns(mut self, limit: usize) -> Self {
        self.max_turns = Some(limit);
        self
    }

    /// Sets the microtask budget.
    pub fn with_microtask_budget(mut self, limit: usize) -> Self {
        self.microtask_budget = Some(limit);
        self
    }
}
