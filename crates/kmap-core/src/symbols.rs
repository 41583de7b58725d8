//! Symbol table facade and its in-memory implementation.
//!
//! The resolver never talks to a host compiler directly. Everything it needs
//! to know about declared types goes through the [`SymbolTable`] trait:
//! - enumerate the declared members of a type
//! - look up one member by exact name
//! - compare two types (identity and erasure)
//! - find the partner declaration a type carries, if any
//!
//! [`TypeTable`] is the in-memory implementation. It is what tests build by
//! hand and what the CLI deserializes from a manifest. Storage is
//! `BTreeMap`-based so iteration (and therefore every diagnostic listing) is
//! deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Location, TypeRef};

// ============================================================================
// Descriptors
// ============================================================================

/// A named member of a declared type.
///
/// `is_method_accessor` is true when the member is reached through a call
/// (`theAge()`) rather than a field read or write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Member name, exactly as declared.
    pub name: String,
    /// Declared type of the member (return type for a getter method,
    /// parameter type for a setter method).
    pub declared_type: TypeRef,
    /// Whether access goes through a method call.
    #[serde(default)]
    pub is_method_accessor: bool,
    /// Declaration site in host source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl PropertyDescriptor {
    /// Create a field member.
    pub fn field(name: impl Into<String>, declared_type: TypeRef) -> Self {
        PropertyDescriptor {
            name: name.into(),
            declared_type,
            is_method_accessor: false,
            location: None,
        }
    }

    /// Create a method accessor member.
    pub fn method(name: impl Into<String>, declared_type: TypeRef) -> Self {
        PropertyDescriptor {
            name: name.into(),
            declared_type,
            is_method_accessor: true,
            location: None,
        }
    }

    /// Attach a declaration site.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// A declared type and its members in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    /// The declared type (raw; type parameters are not tracked).
    pub name: TypeRef,
    /// Declared members, in declaration order.
    #[serde(default)]
    pub members: Vec<PropertyDescriptor>,
}

impl TypeDeclaration {
    /// Create an empty declaration.
    pub fn new(name: TypeRef) -> Self {
        TypeDeclaration {
            name,
            members: Vec::new(),
        }
    }

    /// Add a member (builder style).
    pub fn with_member(mut self, member: PropertyDescriptor) -> Self {
        self.members.push(member);
        self
    }
}

/// A source type's pairing with its target type.
///
/// This is what makes a type "mapped": both of its conversion functions are
/// generated into `package`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerDeclaration {
    /// The type carrying the directives.
    pub source: TypeRef,
    /// The type it converts to and from.
    pub target: TypeRef,
    /// Package that receives the generated units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl PartnerDeclaration {
    /// Create a new declaration.
    pub fn new(source: TypeRef, target: TypeRef, package: Option<String>) -> Self {
        PartnerDeclaration {
            source,
            target,
            package,
        }
    }
}

// ============================================================================
// Facade
// ============================================================================

/// Read-only queries over declared types.
///
/// Members are looked up by the erasure of the given type, so
/// `a.Box<a.Item>` finds the members declared on `a.Box`.
pub trait SymbolTable {
    /// Declared members of `ty`, or `None` when the type is unknown.
    fn members(&self, ty: &TypeRef) -> Option<&[PropertyDescriptor]>;

    /// The partner declaration `ty` carries as a source type, if any.
    fn map_partner(&self, ty: &TypeRef) -> Option<&PartnerDeclaration>;

    /// Find a member by exact, case-sensitive name.
    fn lookup_member(&self, ty: &TypeRef, name: &str) -> Option<&PropertyDescriptor> {
        self.members(ty)?.iter().find(|m| m.name == name)
    }

    /// Names of all declared members, in declaration order.
    fn member_names(&self, ty: &TypeRef) -> Vec<String> {
        self.members(ty)
            .map(|members| members.iter().map(|m| m.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Whether two types are identical.
    fn is_same_type(&self, a: &TypeRef, b: &TypeRef) -> bool {
        a == b
    }

    /// The raw type of `ty`.
    fn erasure(&self, ty: &TypeRef) -> TypeRef {
        ty.erasure()
    }

    /// Fully qualified rendering of `ty`, type arguments included.
    fn qualified_name(&self, ty: &TypeRef) -> String {
        ty.to_string()
    }
}

// ============================================================================
// In-memory table
// ============================================================================

/// In-memory [`SymbolTable`].
///
/// Serializes as `{ "types": [...], "partners": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TypeTableData", into = "TypeTableData")]
pub struct TypeTable {
    /// Qualified name → declaration.
    types: BTreeMap<String, TypeDeclaration>,
    /// Source qualified name → partner declaration.
    partners: BTreeMap<String, PartnerDeclaration>,
}

/// Wire form of [`TypeTable`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TypeTableData {
    #[serde(default)]
    types: Vec<TypeDeclaration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    partners: Vec<PartnerDeclaration>,
}

impl From<TypeTableData> for TypeTable {
    fn from(data: TypeTableData) -> Self {
        let mut table = TypeTable::new();
        for decl in data.types {
            table.insert_type(decl);
        }
        for partner in data.partners {
            table.insert_partner(partner);
        }
        table
    }
}

impl From<TypeTable> for TypeTableData {
    fn from(table: TypeTable) -> Self {
        TypeTableData {
            types: table.types.into_values().collect(),
            partners: table.partners.into_values().collect(),
        }
    }
}

impl TypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        TypeTable::default()
    }

    /// Insert (or replace) a type declaration.
    pub fn insert_type(&mut self, decl: TypeDeclaration) {
        self.types.insert(decl.name.name.clone(), decl);
    }

    /// Insert (or replace) the partner declaration of a source type.
    pub fn insert_partner(&mut self, partner: PartnerDeclaration) {
        self.partners
            .insert(partner.source.name.clone(), partner);
    }

    /// Iterate over all declarations (sorted by qualified name).
    pub fn declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.types.values()
    }

    /// Iterate over all partner declarations (sorted by source name).
    pub fn partners(&self) -> impl Iterator<Item = &PartnerDeclaration> {
        self.partners.values()
    }

    /// Number of declared types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl SymbolTable for TypeTable {
    fn members(&self, ty: &TypeRef) -> Option<&[PropertyDescriptor]> {
        self.types.get(&ty.name).map(|decl| decl.members.as_slice())
    }

    fn map_partner(&self, ty: &TypeRef) -> Option<&PartnerDeclaration> {
        self.partners.get(&ty.name)
    }
}

// ============================================================================
// Tests
// ============================================================================
