//! JSON output types for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** every response has `status` as its first field
//!    (`"ok"`, `"failed"` when some pair was rejected, `"error"` when the
//!    command could not run at all)
//! 2. **Deterministic:** same input, same bytes; units and diagnostics keep
//!    pair order
//! 3. **Versioned:** `schema_version` enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::error::{KmapError, OutputErrorCode};
use crate::synth::{ContentHash, Direction, GeneratedUnit};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

fn status_for(rejected: usize) -> String {
    if rejected == 0 { "ok" } else { "failed" }.to_string()
}

// ============================================================================
// Units
// ============================================================================

/// One generated unit as reported by `generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInfo {
    /// Unit name, e.g. `toValue`.
    pub name: String,
    pub package: String,
    pub direction: Direction,
    /// Qualified receiver type.
    pub receiver: String,
    /// Qualified returned type.
    pub returns: String,
    /// Path relative to the output directory.
    pub file: String,
    /// SHA-256 of the rendered text.
    pub content_hash: ContentHash,
    /// Rendered text; only present for dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UnitInfo {
    /// Describe `unit`, located at `file` under the output directory.
    pub fn from_unit(unit: &GeneratedUnit, file: impl Into<String>) -> Self {
        UnitInfo {
            name: unit.name.clone(),
            package: unit.package.clone(),
            direction: unit.direction,
            receiver: unit.function.receiver.to_string(),
            returns: unit.function.returns.to_string(),
            file: file.into(),
            content_hash: unit.content_hash(),
            content: None,
        }
    }

    /// Attach the rendered text.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response for `generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// `"ok"` or `"failed"`.
    pub status: String,
    pub schema_version: String,
    pub pairs_total: usize,
    pub pairs_rejected: usize,
    /// Whether files were written.
    pub written: bool,
    pub units: Vec<UnitInfo>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerateResponse {
    pub fn new(
        pairs_total: usize,
        pairs_rejected: usize,
        written: bool,
        units: Vec<UnitInfo>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        GenerateResponse {
            status: status_for(pairs_rejected),
            schema_version: SCHEMA_VERSION.to_string(),
            pairs_total,
            pairs_rejected,
            written,
            units,
            diagnostics,
        }
    }
}

/// Response for `check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// `"ok"` or `"failed"`.
    pub status: String,
    pub schema_version: String,
    pub pairs_total: usize,
    pub pairs_rejected: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResponse {
    pub fn new(pairs_total: usize, pairs_rejected: usize, diagnostics: Vec<Diagnostic>) -> Self {
        CheckResponse {
            status: status_for(pairs_rejected),
            schema_version: SCHEMA_VERSION.to_string(),
            pairs_total,
            pairs_rejected,
            diagnostics,
        }
    }
}

/// State of one expected unit on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    /// File content matches the generated text.
    Fresh,
    /// File exists with different content.
    Stale,
    /// File does not exist.
    Missing,
}

/// One entry of a `verify` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyEntry {
    /// Path relative to the output directory.
    pub file: String,
    pub state: UnitState,
    pub expected_hash: ContentHash,
    /// Hash of the file on disk, when it exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hash: Option<ContentHash>,
}

/// Response for `verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// `"ok"` when every unit is fresh and every pair valid, else `"failed"`.
    pub status: String,
    pub schema_version: String,
    pub units: Vec<VerifyEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl VerifyResponse {
    pub fn new(units: Vec<VerifyEntry>, diagnostics: Vec<Diagnostic>) -> Self {
        let clean = diagnostics.is_empty() && units.iter().all(|u| u.state == UnitState::Fresh);
        VerifyResponse {
            status: if clean { "ok" } else { "failed" }.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            units,
            diagnostics,
        }
    }

    /// Number of units that are not fresh.
    pub fn out_of_date(&self) -> usize {
        self.units
            .iter()
            .filter(|u| u.state != UnitState::Fresh)
            .count()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code (also the exit code).
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn from_error(err: &KmapError) -> Self {
        let details = match err {
            KmapError::FileNotFound { path }
            | KmapError::InvalidManifest { path, .. }
            | KmapError::WriteError { path, .. } => Some(serde_json::json!({ "path": path })),
            KmapError::ValidationFailed { rejected, total } => {
                Some(serde_json::json!({ "rejected": rejected, "total": total }))
            }
            KmapError::OutOfDate { stale, total } => {
                Some(serde_json::json!({ "stale": stale, "total": total }))
            }
            KmapError::InvalidArguments { .. } | KmapError::InternalError { .. } => None,
        };
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            details,
        }
    }
}

/// Response for a command that could not run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &KmapError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
///
/// This is the single JSON output path for the CLI.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
