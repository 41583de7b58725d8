//! Accessor name resolution.
//!
//! Each directive yields four access names: get and set on the source side,
//! get and set on the target side. Every one of them follows the same
//! precedence:
//!
//! 1. the explicit accessor override for that role (`targetGet`, `thisSet`, ...)
//! 2. the side's name override (`value` / `thisValue`)
//! 3. the local property name
//!
//! Getter and setter are independent axes: an empty `targetSet` falls back
//! through `value` and the local name, never to `targetGet`.

use crate::directive::{AccessName, MappingDirective};

/// The overrides for one side of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideOverrides<'a> {
    /// Name override (`value` or `thisValue`).
    pub value: &'a str,
    /// Explicit getter (`targetGet` or `thisGet`).
    pub get: &'a str,
    /// Explicit setter (`targetSet` or `thisSet`).
    pub set: &'a str,
}

impl<'a> SideOverrides<'a> {
    /// Target-side overrides of a directive.
    pub fn target(directive: &'a MappingDirective) -> Self {
        SideOverrides {
            value: &directive.value,
            get: &directive.target_get,
            set: &directive.target_set,
        }
    }

    /// Source-side overrides of a directive.
    pub fn source(directive: &'a MappingDirective) -> Self {
        SideOverrides {
            value: &directive.this_value,
            get: &directive.this_get,
            set: &directive.this_set,
        }
    }
}

/// Resolve one access name: explicit override, then value, then local name.
pub fn resolve_access_name(local_name: &str, value: &str, explicit: &str) -> AccessName {
    let chosen = if !explicit.is_empty() {
        explicit
    } else if !value.is_empty() {
        value
    } else {
        local_name
    };
    AccessName::parse(chosen)
}

/// Resolved getter and setter of one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideAccessors {
    pub get: AccessName,
    pub set: AccessName,
}

impl SideAccessors {
    /// Resolve both roles of one side.
    pub fn resolve(local_name: &str, overrides: SideOverrides<'_>) -> Self {
        SideAccessors {
            get: resolve_access_name(local_name, overrides.value, overrides.get),
            set: resolve_access_name(local_name, overrides.value, overrides.set),
        }
    }
}

/// All four access names of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveAccessors {
    pub source: SideAccessors,
    pub target: SideAccessors,
}

impl DirectiveAccessors {
    /// Resolve every access name of `directive` for the property `local_name`.
    pub fn resolve(local_name: &str, directive: &MappingDirective) -> Self {
        DirectiveAccessors {
            source: SideAccessors::resolve(local_name, SideOverrides::source(directive)),
            target: SideAccessors::resolve(local_name, SideOverrides::target(directive)),
        }
    }
}
