//! Per-property mapping directives and access names.
//!
//! A [`MappingDirective`] is the already-parsed form of one `KMap` annotation.
//! Access names written in a directive use a trailing `()` to mean "method
//! accessor"; that convention is decoded exactly once, here, into
//! [`AccessName`]. Nothing downstream looks at the raw string again.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix that marks an access name as a method accessor.
pub const CALL_MARKER: &str = "()";

/// Separator between segments of a nested access path.
pub const PATH_SEPARATOR: char = '.';

// ============================================================================
// Side
// ============================================================================

/// Which of the two partner types a name or path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The type carrying the directives (`this*` overrides).
    Source,
    /// The partner type (`value`, `target*` overrides).
    Target,
}

impl Side {
    /// Directive field holding this side's name override.
    pub fn value_field(self) -> &'static str {
        match self {
            Side::Source => "thisValue",
            Side::Target => "value",
        }
    }

    /// Directive field holding this side's explicit getter.
    pub fn get_field(self) -> &'static str {
        match self {
            Side::Source => "thisGet",
            Side::Target => "targetGet",
        }
    }

    /// Directive field holding this side's explicit setter.
    pub fn set_field(self) -> &'static str {
        match self {
            Side::Source => "thisSet",
            Side::Target => "targetSet",
        }
    }

    /// How diagnostics refer to a property of this side.
    pub fn property_label(self) -> &'static str {
        match self {
            Side::Source => "sourceProperty",
            Side::Target => "targetProperty",
        }
    }
}

// ============================================================================
// MappingDirective
// ============================================================================

/// One directive, attached to one source property.
///
/// Every field defaults to `""`, which means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingDirective {
    /// Target property name override.
    pub value: String,
    /// Explicit target getter.
    pub target_get: String,
    /// Explicit target setter.
    pub target_set: String,
    /// Source property name override.
    pub this_value: String,
    /// Explicit source getter.
    pub this_get: String,
    /// Explicit source setter.
    pub this_set: String,
}

impl MappingDirective {
    /// A directive with every override unset.
    pub fn new() -> Self {
        MappingDirective::default()
    }

    /// Set the target name override.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the explicit target getter.
    pub fn with_target_get(mut self, get: impl Into<String>) -> Self {
        self.target_get = get.into();
        self
    }

    /// Set the explicit target setter.
    pub fn with_target_set(mut self, set: impl Into<String>) -> Self {
        self.target_set = set.into();
        self
    }

    /// Set the source name override.
    pub fn with_this_value(mut self, value: impl Into<String>) -> Self {
        self.this_value = value.into();
        self
    }

    /// Set the explicit source getter.
    pub fn with_this_get(mut self, get: impl Into<String>) -> Self {
        self.this_get = get.into();
        self
    }

    /// Set the explicit source setter.
    pub fn with_this_set(mut self, set: impl Into<String>) -> Self {
        self.this_set = set.into();
        self
    }
}

// ============================================================================
// AccessName
// ============================================================================

/// A resolved access name, tagged with its accessor kind.
///
/// The name may be dotted (`size.width`); the kind applies to the last
/// segment only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum AccessName {
    /// Plain field read/write.
    Field(String),
    /// Method call (`name()` to read, `name(value)` to write).
    Method(String),
}

impl AccessName {
    /// Decode a directive string, stripping the call marker.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix(CALL_MARKER) {
            Some(bare) => AccessName::Method(bare.to_string()),
            None => AccessName::Field(raw.to_string()),
        }
    }

    /// The bare name (no call marker).
    pub fn name(&self) -> &str {
        match self {
            AccessName::Field(name) | AccessName::Method(name) => name,
        }
    }

    /// Whether the leaf segment is a method accessor.
    pub fn is_method(&self) -> bool {
        matches!(self, AccessName::Method(_))
    }
}

impl fmt::Display for AccessName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessName::Field(name) => write!(f, "{}", name),
            AccessName::Method(name) => write!(f, "{}{}", name, CALL_MARKER),
        }
    }
}

// ============================================================================
// Local property names
// ============================================================================

/// Normalize a host element name into the property name a directive refers to.
///
/// Hosts that compile properties to accessor methods attach annotations to a
/// synthetic holder such as `getAge$annotations`. For methods the suffix
/// `$annotations` and the prefix `get` are removed and the first character is
/// lowercased. Field names are returned unchanged.
pub fn local_property_name(element_name: &str, is_method: bool) -> String {
    if !is_method {
        return element_name.to_string();
    }
    let name = element_name
        .strip_suffix("$annotations")
        .unwrap_or(element_name);
    let name = name.strip_prefix("get").unwrap_or(name);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
