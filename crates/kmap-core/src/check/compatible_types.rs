//! Type compatibility of mapped leaves.
//!
//! Two types are compatible when they are the same type, or when they share
//! an erasure and their type arguments are pairwise compatible. Each
//! directive is checked in the forward direction first and then in reverse;
//! the first mismatch is the only one reported for that directive.
//!
//! When a property goes through a partner chain, the value written on the
//! target side is the nested pair's target type, not the property's own
//! type, and the value read from the target side must be that same type for
//! the nested reverse function to apply. The reverse function returns the
//! nested source type, so the source setter must accept that type.

use crate::diagnostic::Diagnostic;
use crate::error::MappingError;
use crate::plan::ResolvedDirective;
use crate::symbols::SymbolTable;
use crate::types::TypeRef;

use super::Check;

#[derive(Debug, Clone, Default)]
pub struct CompatibleTypesCheck {
    errors: Vec<Diagnostic>,
}

impl CompatibleTypesCheck {
    /// Check every fully resolved directive; unresolved ones are skipped
    /// (existence failures are reported by their own check).
    pub fn run<T: SymbolTable + ?Sized>(table: &T, resolved: &[ResolvedDirective<'_>]) -> Self {
        let errors = resolved
            .iter()
            .filter_map(|directive| {
                first_mismatch(table, directive).map(|err| {
                    Diagnostic::error(&err, directive.subject(), directive.location())
                })
            })
            .collect();
        CompatibleTypesCheck { errors }
    }
}

impl Check for CompatibleTypesCheck {
    fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}

/// Whether a value of type `a` may be assigned where `b` is declared.
pub fn types_compatible<T: SymbolTable + ?Sized>(table: &T, a: &TypeRef, b: &TypeRef) -> bool {
    if table.is_same_type(a, b) {
        return true;
    }
    table.erasure(a) == table.erasure(b)
        && a.args.len() == b.args.len()
        && a.args
            .iter()
            .zip(&b.args)
            .all(|(x, y)| types_compatible(table, x, y))
}

fn first_mismatch<T: SymbolTable + ?Sized>(
    table: &T,
    directive: &ResolvedDirective<'_>,
) -> Option<MappingError> {
    let source_get = directive.source_get.as_ref().ok()?;
    let source_set = directive.source_set.as_ref().ok()?;
    let target_get = directive.target_get.as_ref().ok()?;
    let target_set = directive.target_set.as_ref().ok()?;

    let target_set = &target_set.leaf().declared_type;
    let target_get = &target_get.leaf().declared_type;
    let source_set = &source_set.leaf().declared_type;

    let pairs = match &directive.partner {
        // the reverse conversion yields the nested source type, which must
        // fit the source setter
        Some(chain) => vec![
            (&chain.target, target_set),
            (&chain.target, target_get),
            (source_set, &chain.source),
        ],
        None => vec![
            (&source_get.leaf().declared_type, target_set),
            (source_set, target_get),
        ],
    };
    pairs
        .into_iter()
        .find(|(source, target)| !types_compatible(table, source, target))
        .map(|(source, target)| MappingError::IncompatibleTypes {
            source_type: source.clone(),
            target_type: target.clone(),
        })
}
