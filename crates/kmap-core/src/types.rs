//! Common types shared between the symbol table, diagnostics and output modules.
//!
//! This module contains the two value types everything else is built from:
//! - [`Location`]: where in host source a declaration lives
//! - [`TypeRef`]: a symbolic reference to a declared type, with type arguments

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Location Type
// ============================================================================

/// Location in a host source file.
///
/// The core never reads files; locations are carried through from the host
/// so diagnostics can point back at the originating directive or pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    /// File path as reported by the host.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub col: u32,
}

impl Location {
    /// Create a new location.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

// ============================================================================
// TypeRef
// ============================================================================

/// Error produced when a textual type reference cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeRefError {
    /// A type name (or type argument) was empty.
    #[error("empty type name in '{input}'")]
    EmptyName { input: String },

    /// Angle brackets did not balance.
    #[error("unbalanced type arguments in '{input}'")]
    Unbalanced { input: String },

    /// Text remained after a complete type reference.
    #[error("unexpected trailing input in '{input}'")]
    TrailingInput { input: String },
}

/// A symbolic reference to a declared type.
///
/// `name` is the fully qualified name (`basic.same_name.User`); `args` are the
/// type arguments of a parameterized type, in declaration order. The textual
/// form is `kotlin.collections.List<kotlin.String>`, and that is also how a
/// `TypeRef` serializes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    /// Fully qualified name, without type arguments.
    pub name: String,
    /// Type arguments (empty for non-generic types).
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// Create a type reference without type arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Create a parameterized type reference.
    pub fn with_args(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef {
            name: name.into(),
            args,
        }
    }

    /// The fully qualified name (no type arguments).
    pub fn qualified_name(&self) -> &str {
        &self.name
    }

    /// The last dot-separated component of the qualified name.
    pub fn simple_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }

    /// Everything before the simple name; empty for the root package.
    pub fn package(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[..idx],
            None => "",
        }
    }

    /// The raw type: same name, no type arguments.
    pub fn erasure(&self) -> TypeRef {
        TypeRef::named(self.name.clone())
    }

    /// Whether this reference carries type arguments.
    pub fn is_parameterized(&self) -> bool {
        !self.args.is_empty()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl FromStr for TypeRef {
    type Err = TypeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ty, rest) = parse_type_ref(s, s)?;
        if !rest.trim().is_empty() {
            return Err(TypeRefError::TrailingInput {
                input: s.to_string(),
            });
        }
        Ok(ty)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

/// Parse one type reference from the front of `input`, returning the rest.
fn parse_type_ref<'a>(input: &'a str, whole: &str) -> Result<(TypeRef, &'a str), TypeRefError> {
    let input = input.trim_start();
    let end = input.find(['<', ',', '>']).unwrap_or(input.len());
    let name = input[..end].trim();
    if name.is_empty() {
        return Err(TypeRefError::EmptyName {
            input: whole.to_string(),
        });
    }

    let mut rest = &input[end..];
    let mut args = Vec::new();
    if let Some(after_open) = rest.strip_prefix('<') {
        rest = after_open;
        loop {
            let (arg, after_arg) = parse_type_ref(rest, whole)?;
            args.push(arg);
            let after_arg = after_arg.trim_start();
            if let Some(next) = after_arg.strip_prefix(',') {
                rest = next;
            } else if let Some(next) = after_arg.strip_prefix('>') {
                rest = next;
                break;
            } else {
                return Err(TypeRefError::Unbalanced {
                    input: whole.to_string(),
                });
            }
        }
    }

    Ok((TypeRef::with_args(name, args), rest))
}

// ============================================================================
// Tests
// ============================================================================
