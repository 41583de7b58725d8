//! Error types and error code constants for kmap.
//!
//! Two layers:
//! - [`MappingError`]: the user-facing problems found while resolving and
//!   validating one pair. Each variant's `Display` is the exact diagnostic
//!   text. These are collected, never thrown.
//! - [`KmapError`]: the unified error for the CLI front door, with a stable
//!   exit code per [`OutputErrorCode`].
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (manifest missing or malformed)
//! - `4`: Write errors (failed to write generated units)
//! - `5`: Validation failed (one or more pairs rejected)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use thiserror::Error;

use crate::directive::Side;
use crate::types::TypeRef;

// ============================================================================
// Mapping Errors
// ============================================================================

/// A problem with one pair or one directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The pair declaration has no package for its generated units.
    #[error("MapPartner doesn't contain parameter packageName.")]
    MissingPackageName,

    /// The package is not a dot-separated list of identifiers.
    #[error("MapPartner parameter packageName is not a valid package name: {package}.")]
    InvalidPackageName { package: String },

    /// A name override is shadowed by both explicit accessors of its side.
    #[error(
        "KMap.{} is redundant when KMap.{} and KMap.{} are set.",
        .side.value_field(),
        .side.get_field(),
        .side.set_field()
    )]
    RedundantDirectiveShape { side: Side },

    /// A path segment did not match any declared member.
    #[error(
        "Couldn't find {} in {owner}. Enclosed elements are: {}. Expected name was: {name}.",
        .side.property_label(),
        .enclosed.join(", ")
    )]
    UnresolvedMember {
        side: Side,
        owner: TypeRef,
        name: String,
        enclosed: Vec<String>,
    },

    /// The leaves of a mapping have incompatible declared types.
    #[error(
        "The types of the properties that are mapped with KMap must be compatible. \
         The source type is {source_type} and the target type is {target_type}."
    )]
    IncompatibleTypes {
        source_type: TypeRef,
        target_type: TypeRef,
    },

    /// Another pair in the same run already generates a unit at this path.
    #[error("Generated unit {package}.{unit} collides with the unit generated for {other}.")]
    DuplicateUnit {
        package: String,
        unit: String,
        other: TypeRef,
    },
}

impl MappingError {
    /// Stable machine-readable code for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            MappingError::MissingPackageName => "missing_package_name",
            MappingError::InvalidPackageName { .. } => "invalid_package_name",
            MappingError::RedundantDirectiveShape { .. } => "redundant_directive_shape",
            MappingError::UnresolvedMember { .. } => "unresolved_member",
            MappingError::IncompatibleTypes { .. } => "incompatible_types",
            MappingError::DuplicateUnit { .. } => "duplicate_unit",
        }
    }
}

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output; they double as CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller.
    InvalidArguments = 2,
    /// Manifest could not be found or read.
    ResolutionError = 3,
    /// Generated units could not be written.
    WriteError = 4,
    /// At least one pair was rejected.
    ValidationFailed = 5,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum KmapError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Manifest file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Manifest could not be parsed.
    #[error("invalid manifest {path}: {message}")]
    InvalidManifest { path: String, message: String },

    /// One or more pairs failed validation.
    #[error("validation failed: {rejected} of {total} pair(s) rejected")]
    ValidationFailed { rejected: usize, total: usize },

    /// Generated units on disk do not match what would be generated.
    #[error("{stale} of {total} generated unit(s) out of date")]
    OutOfDate { stale: usize, total: usize },

    /// A generated unit could not be written.
    #[error("write error at {path}: {message}")]
    WriteError { path: String, message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl From<&KmapError> for OutputErrorCode {
    fn from(err: &KmapError) -> Self {
        match err {
            KmapError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            KmapError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            KmapError::InvalidManifest { .. } => OutputErrorCode::ResolutionError,
            KmapError::ValidationFailed { .. } => OutputErrorCode::ValidationFailed,
            KmapError::OutOfDate { .. } => OutputErrorCode::ValidationFailed,
            KmapError::WriteError { .. } => OutputErrorCode::WriteError,
            KmapError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<KmapError> for OutputErrorCode {
    fn from(err: KmapError) -> Self {
        OutputErrorCode::from(&err)
    }
}

impl KmapError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        KmapError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        KmapError::FileNotFound { path: path.into() }
    }

    /// Create a write error.
    pub fn write(path: impl Into<String>, message: impl Into<String>) -> Self {
        KmapError::WriteError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        KmapError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }

    /// Whether the command already reported the details of this failure
    /// in its own output (diagnostics or a verify report).
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            KmapError::ValidationFailed { .. } | KmapError::OutOfDate { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
