//! The callback ledger: continuation pairs waiting on a pending promise.

use core_types::Value;

/// How a promise settled.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    Fulfilled(Value),
    Rejected(Value),
}

impl Outcome {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Outcome::Fulfilled(_) => "fulfilled",
            Outcome::Rejected(_) => "rejected",
        }
    }
}

type Branch = Box<dyn FnOnce(Value)>;

/// A continuation pair registered on a promise.
///
/// Exactly one of the two branches runs, chosen by the final outcome.
pub(crate) struct Reaction {
    on_fulfilled: Branch,
    on_rejected: Branch,
}

impl Reaction {
    pub(crate) fn new<F, R>(on_fulfilled: F, on_rejected: R) -> Self
    where
        F: FnOnce(Value) + 'static,
        R: FnOnce(Value) + 'static,
    {
        Self {
            on_fulfilled: Box::new(on_fulfilled),
            on_rejected: Box::new(on_rejected),
        }
    }

    /// Runs the branch matching `outcome`, consuming the pair.
    pub(crate) fn fire(self, outcome: Outcome) {
        match outcome {
            Outcome::Fulfilled(value) => (self.on_fulfilled)(value),
            Outcome::Rejected(reason) => (self.on_rejected)(reason),
        }
    }
}

impl std::fmt::Debug for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reaction {{ ... }}")
    }
}

/// Reactions in registration order.
///
/// Append-only while the owning promise is pending; drained exactly once when
/// it settles.
#[derive(Debug, Default)]
pub(crate) struct ReactionLedger {
    reactions: Vec<Reaction>,
}

impl ReactionLedger {
    pub(crate) fn push(&mut self, reaction: Reaction) {
        self.reactions.push(reaction);
    }

    /// Takes every queued reaction, leaving the ledger empty.
    pub(crate) fn drain(&mut self) -> Vec<Reaction> {
        std::mem::take(&mut self.reactions)
    }

    pub(crate) fn len(&self) -> usize {
        self.reactions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }
}
