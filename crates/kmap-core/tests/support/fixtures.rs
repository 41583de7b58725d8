//! Fixture builders for in-memory symbol tables and pair requests.
//!
//! Members are written as `(name, type)` tuples; a name ending in `()` is
//! declared as a method accessor.

use kmap_core::directive::MappingDirective;
use kmap_core::pair::{DirectiveSite, PairRequest};
use kmap_core::symbols::{PartnerDeclaration, PropertyDescriptor, TypeDeclaration, TypeTable};
use kmap_core::types::TypeRef;

/// Parse a type reference, panicking on malformed input.
pub fn ty(name: &str) -> TypeRef {
    name.parse()
        .unwrap_or_else(|e| panic!("bad type reference {name}: {e}"))
}

fn member(name: &str, declared: &str) -> PropertyDescriptor {
    match name.strip_suffix("()") {
        Some(bare) => PropertyDescriptor::method(bare, ty(declared)),
        None => PropertyDescriptor::field(name, ty(declared)),
    }
}

/// Builder for a [`TypeTable`].
#[derive(Default)]
pub struct TableBuilder {
    table: TypeTable,
}

impl TableBuilder {
    pub fn new() -> Self {
        TableBuilder::default()
    }

    /// Declare a type with the given members, in order.
    pub fn class(mut self, name: &str, members: &[(&str, &str)]) -> Self {
        let decl = members
            .iter()
            .fold(TypeDeclaration::new(ty(name)), |decl, (m, t)| {
                decl.with_member(member(m, t))
            });
        self.table.insert_type(decl);
        self
    }

    /// Declare `source` as mapped to `target`, generating into `package`.
    pub fn partner(mut self, source: &str, target: &str, package: &str) -> Self {
        self.table.insert_partner(PartnerDeclaration::new(
            ty(source),
            ty(target),
            Some(package.to_string()),
        ));
        self
    }

    /// Declare `source` as mapped to `target` with no package.
    pub fn partner_without_package(mut self, source: &str, target: &str) -> Self {
        self.table
            .insert_partner(PartnerDeclaration::new(ty(source), ty(target), None));
        self
    }

    pub fn build(self) -> TypeTable {
        self.table
    }
}

/// Builder for a [`PairRequest`].
pub struct PairBuilder {
    pair: PairRequest,
}

impl PairBuilder {
    pub fn new(source: &str, target: &str, package: &str) -> Self {
        PairBuilder {
            pair: PairRequest::new(ty(source), ty(target), Some(package.to_string())),
        }
    }

    /// A pair declared without a package.
    pub fn without_package(source: &str, target: &str) -> Self {
        PairBuilder {
            pair: PairRequest::new(ty(source), ty(target), None),
        }
    }

    /// Add a directive on source property `property` of type `declared`.
    pub fn map(mut self, property: &str, declared: &str, directive: MappingDirective) -> Self {
        self.pair
            .directives
            .push(DirectiveSite::new(member(property, declared), directive));
        self
    }

    /// Add a directive with every override unset.
    pub fn same(self, property: &str, declared: &str) -> Self {
        self.map(property, declared, MappingDirective::new())
    }

    pub fn build(self) -> PairRequest {
        self.pair
    }
}
