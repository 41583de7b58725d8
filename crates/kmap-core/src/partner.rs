//! Partner chain detection.
//!
//! A property whose type is itself a mapped source type is not copied: its
//! value is routed through that type's own generated conversion function.
//! Detection is one membership test on the first segment of the source
//! getter chain. Nested graphs, including self-referential ones, compose
//! because every mapped type gets its own pair of functions; nothing here
//! recurses into the nested type.

use serde::Serialize;

use crate::path::AccessPath;
use crate::symbols::{PartnerDeclaration, SymbolTable};
use crate::types::TypeRef;

/// Name of the function that converts a value into `ty`.
pub fn conversion_function_name(ty: &TypeRef) -> String {
    format!("to{}", ty.simple_name())
}

/// A property routed through a nested pair's conversion functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerChain {
    /// The nested source type (the property's own type).
    pub source: TypeRef,
    /// The nested pair's target type.
    pub target: TypeRef,
    /// Package holding the nested pair's generated units.
    pub package: Option<String>,
}

impl PartnerChain {
    /// Build from the nested type's partner declaration.
    pub fn from_declaration(decl: &PartnerDeclaration) -> Self {
        PartnerChain {
            source: decl.source.clone(),
            target: decl.target.clone(),
            package: decl.package.clone(),
        }
    }

    /// Function called when mapping source → target.
    pub fn forward_function(&self) -> String {
        conversion_function_name(&self.target)
    }

    /// Function called when mapping target → source.
    pub fn reverse_function(&self) -> String {
        conversion_function_name(&self.source)
    }
}

/// Check whether the source getter chain starts at a mapped type.
///
/// Only a direct chain qualifies: when the first segment is merely an
/// intermediate hop (`size.width`), the value read is the leaf, not the
/// mapped object, and is copied as-is.
pub fn detect_partner_chain<T: SymbolTable + ?Sized>(
    table: &T,
    source_get: &AccessPath,
) -> Option<PartnerChain> {
    if !source_get.is_direct() {
        return None;
    }
    table
        .map_partner(&source_get.first().declared_type)
        .map(PartnerChain::from_declaration)
}
