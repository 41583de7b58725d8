//! kmap: generates bidirectional conversion functions between partner types.
//!
//! The binary reads a manifest describing the host's declared types, partner
//! declarations and mapping directives, validates every pair with
//! [`kmap_core`], and writes one source unit per direction for each valid
//! pair.
//!
//! ## Modules
//!
//! - [`config`] - layered configuration (defaults, `kmap.toml`, env, flags)
//! - [`manifest`] - manifest loading
//! - [`runner`] - pair processing across a manifest
//! - [`writer`] - unit files on disk
//! - [`cli`] - command implementations

pub mod cli;
pub mod config;
pub mod manifest;
pub mod runner;
pub mod writer;

pub use cli::{OutputFormat, run_check, run_generate, run_verify};
pub use config::{CliOverrides, ResolvedConfig};
