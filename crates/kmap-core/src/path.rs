//! Access path resolution.
//!
//! An access name like `size.width` is resolved against a starting type one
//! segment at a time: look up `size` in the start type, take its declared
//! type, look up `width` there, and so on. Chains may be of any length; a
//! plain name yields a chain of one.
//!
//! The call marker of an [`AccessName`] belongs to the leaf. Intermediate
//! segments take their accessor kind from the member they resolved to.

use serde::Serialize;

use crate::directive::{AccessName, PATH_SEPARATOR};
use crate::symbols::SymbolTable;
use crate::types::TypeRef;

// ============================================================================
// Types
// ============================================================================

/// One resolved member lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessSegment {
    /// Member name.
    pub name: String,
    /// Whether the member is accessed through a call.
    pub is_method: bool,
    /// Declared type of the member.
    pub declared_type: TypeRef,
}

/// A non-empty, resolved chain of member lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessPath {
    segments: Vec<AccessSegment>,
}

impl AccessPath {
    /// Build a path from segments. Returns `None` for an empty chain.
    pub fn new(segments: Vec<AccessSegment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(AccessPath { segments })
        }
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> &[AccessSegment] {
        &self.segments
    }

    /// The first lookup.
    pub fn first(&self) -> &AccessSegment {
        &self.segments[0]
    }

    /// The member actually read or written.
    pub fn leaf(&self) -> &AccessSegment {
        &self.segments[self.segments.len() - 1]
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the chain is a single lookup.
    pub fn is_direct(&self) -> bool {
        self.segments.len() == 1
    }
}

/// A path segment that could not be found.
///
/// `owner` is the type the lookup ran against, `name` the missing segment and
/// `enclosed` the names that owner does declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedMember {
    pub owner: TypeRef,
    pub name: String,
    pub enclosed: Vec<String>,
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve `access` starting at `start`.
pub fn resolve_path<T: SymbolTable + ?Sized>(
    table: &T,
    start: &TypeRef,
    access: &AccessName,
) -> Result<AccessPath, UnresolvedMember> {
    let segments = resolve_segments(
        table,
        start,
        access.name(),
        access.is_method(),
        Vec::new(),
    )?;
    // resolve_segments always pushes at least one segment on success
    Ok(AccessPath { segments })
}

/// Resolve `remaining` against `owner`, appending to `resolved`.
fn resolve_segments<T: SymbolTable + ?Sized>(
    table: &T,
    owner: &TypeRef,
    remaining: &str,
    leaf_is_method: bool,
    mut resolved: Vec<AccessSegment>,
) -> Result<Vec<AccessSegment>, UnresolvedMember> {
    let (head, tail) = match remaining.split_once(PATH_SEPARATOR) {
        Some((head, tail)) => (head, Some(tail)),
        None => (remaining, None),
    };

    let member = table
        .lookup_member(owner, head)
        .ok_or_else(|| UnresolvedMember {
            owner: table.erasure(owner),
            name: head.to_string(),
            enclosed: table.member_names(owner),
        })?;

    let is_method = match tail {
        Some(_) => member.is_method_accessor,
        None => leaf_is_method,
    };
    resolved.push(AccessSegment {
        name: member.name.clone(),
        is_method,
        declared_type: member.declared_type.clone(),
    });

    match tail {
        Some(tail) => {
            let next_owner = member.declared_type.clone();
            resolve_segments(table, &next_owner, tail, leaf_is_method, resolved)
        }
        None => Ok(resolved),
    }
}

// ============================================================================
// Tests
// ============================================================================
