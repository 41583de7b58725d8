//! Core of kmap.
//!
//! Given two declared types and per-property mapping directives, this crate
//! produces a pair of conversion functions (source to target and back):
//! - Symbol table facade and an in-memory table
//! - Directives, accessor name resolution and access paths
//! - Partner chain detection for nested mapped types
//! - Mapping plans and the validation pipeline
//! - Code synthesis and rendering
//! - Diagnostics, error types and JSON output types
//!
//! The entry point is [`pair::process_pair`]. Nothing in this crate does I/O.

pub mod accessor;
pub mod check;
pub mod diagnostic;
pub mod directive;
pub mod error;
pub mod output;
pub mod pair;
pub mod partner;
pub mod path;
pub mod plan;
pub mod render;
pub mod symbols;
pub mod synth;
pub mod types;
