//! Mapping plans.
//!
//! Resolution turns each directive into a [`ResolvedDirective`]: the four
//! access names, the four path lookups (each of which may have failed) and
//! the partner chain, if any. Validation runs over resolved directives; only
//! once a whole pair is clean are they frozen into [`PropertyPlan`]s and a
//! [`MappingPlan`], which is what synthesis consumes.

use serde::Serialize;

use crate::accessor::DirectiveAccessors;
use crate::diagnostic::Subject;
use crate::directive::{AccessName, Side, local_property_name};
use crate::pair::{DirectiveSite, PairRequest};
use crate::partner::{PartnerChain, detect_partner_chain};
use crate::path::{AccessPath, UnresolvedMember, resolve_path};
use crate::symbols::SymbolTable;
use crate::types::{Location, TypeRef};

// ============================================================================
// Resolved directives
// ============================================================================

/// A directive after name and path resolution, before validation.
#[derive(Debug, Clone)]
pub struct ResolvedDirective<'a> {
    /// The directive and the property it is attached to.
    pub site: &'a DirectiveSite,
    /// The source type owning the property.
    pub owner: &'a TypeRef,
    /// Local property name the directive defaults to.
    pub property: String,
    pub accessors: DirectiveAccessors,
    pub source_get: Result<AccessPath, UnresolvedMember>,
    pub source_set: Result<AccessPath, UnresolvedMember>,
    pub target_get: Result<AccessPath, UnresolvedMember>,
    pub target_set: Result<AccessPath, UnresolvedMember>,
    /// Set when the source getter's type is itself a mapped source.
    pub partner: Option<PartnerChain>,
}

impl<'a> ResolvedDirective<'a> {
    /// Resolve one directive of `pair`.
    pub fn resolve<T: SymbolTable + ?Sized>(
        table: &T,
        pair: &'a PairRequest,
        site: &'a DirectiveSite,
    ) -> Self {
        let property = local_property_name(&site.property.name, site.property.is_method_accessor);
        let accessors = DirectiveAccessors::resolve(&property, &site.directive);

        let lookup = |start: &TypeRef, access: &AccessName| resolve_path(table, start, access);
        let source_get = lookup(&pair.source, &accessors.source.get);
        let source_set = lookup(&pair.source, &accessors.source.set);
        let target_get = lookup(&pair.target, &accessors.target.get);
        let target_set = lookup(&pair.target, &accessors.target.set);

        let partner = source_get
            .as_ref()
            .ok()
            .and_then(|path| detect_partner_chain(table, path));

        ResolvedDirective {
            site,
            owner: &pair.source,
            property,
            accessors,
            source_get,
            source_set,
            target_get,
            target_set,
            partner,
        }
    }

    /// What diagnostics about this directive attach to.
    pub fn subject(&self) -> Subject {
        Subject::Property {
            owner: self.owner.to_string(),
            name: self.site.property.name.clone(),
        }
    }

    /// Host location of the annotated property.
    pub fn location(&self) -> Option<Location> {
        self.site.property.location.clone()
    }

    /// Every failed lookup, in (source get, source set, target get, target set) order.
    pub fn unresolved(&self) -> Vec<(Side, &UnresolvedMember)> {
        [
            (Side::Source, &self.source_get),
            (Side::Source, &self.source_set),
            (Side::Target, &self.target_get),
            (Side::Target, &self.target_set),
        ]
        .into_iter()
        .filter_map(|(side, result)| result.as_ref().err().map(|err| (side, err)))
        .collect()
    }

    /// Whether all four lookups succeeded.
    pub fn is_resolved(&self) -> bool {
        self.source_get.is_ok()
            && self.source_set.is_ok()
            && self.target_get.is_ok()
            && self.target_set.is_ok()
    }

    /// Freeze into a property plan; `None` if any lookup failed.
    pub fn to_plan(&self) -> Option<PropertyPlan> {
        Some(PropertyPlan {
            property: self.property.clone(),
            source_get: self.source_get.clone().ok()?,
            source_set: self.source_set.clone().ok()?,
            target_get: self.target_get.clone().ok()?,
            target_set: self.target_set.clone().ok()?,
            partner: self.partner.clone(),
            location: self.location(),
        })
    }
}

// ============================================================================
// Plans
// ============================================================================

/// The resolved, validated mapping of one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyPlan {
    /// Local property name.
    pub property: String,
    pub source_get: AccessPath,
    pub source_set: AccessPath,
    pub target_get: AccessPath,
    pub target_set: AccessPath,
    /// Nested conversion route, when the property's type is mapped itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<PartnerChain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl PropertyPlan {
    /// Whether assignments go through a nested conversion call.
    pub fn requires_partner_chain(&self) -> bool {
        self.partner.is_some()
    }
}

/// The validated plan of a whole pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingPlan {
    pub source: TypeRef,
    pub target: TypeRef,
    /// Package receiving both generated units.
    pub package: String,
    /// One entry per directive, in directive order.
    pub properties: Vec<PropertyPlan>,
}

impl MappingPlan {
    /// Build a plan from fully resolved directives.
    ///
    /// Returns `None` when any directive still has a failed lookup; callers
    /// validate first, so that only happens on misuse.
    pub fn build(
        pair: &PairRequest,
        package: impl Into<String>,
        resolved: &[ResolvedDirective<'_>],
    ) -> Option<Self> {
        let properties = resolved
            .iter()
            .map(ResolvedDirective::to_plan)
            .collect::<Option<Vec<_>>>()?;
        Some(MappingPlan {
            source: pair.source.clone(),
            target: pair.target.clone(),
            package: package.into(),
            properties,
        })
    }

    /// Whether source and target share a simple name.
    pub fn has_simple_name_collision(&self) -> bool {
        self.source.simple_name() == self.target.simple_name()
    }
}

// ============================================================================
// Tests
// ============================================================================
