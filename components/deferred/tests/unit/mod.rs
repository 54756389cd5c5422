//! Unit tests for the deferred crate

mod combinator_test;
mod promise_test;
