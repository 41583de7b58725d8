//! Shared test support utilities.
//!
//! This module provides helpers for integration tests: an in-memory symbol
//! table builder and an evaluator that executes synthesized conversion
//! functions over plain object values.

pub mod eval;
pub mod fixtures;
