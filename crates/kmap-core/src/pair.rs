//! Pair processing.
//!
//! A [`PairRequest`] is one discovered (source, target, directives) triple.
//! [`process_pair`] takes it through the whole pipeline:
//!
//! 1. resolve every directive (accessor names, paths, partner chains)
//! 2. run every check over the pair, collecting every error
//! 3. if anything failed, return all diagnostics and generate nothing
//! 4. otherwise build the plan and synthesize both directions
//!
//! Pairs share no state, so callers may process them in any order or in
//! parallel. The one cross-pair rule is applied afterwards, in input order:
//! two pairs may not generate units at the same path
//! ([`reject_unit_collisions`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info, warn};

use crate::check::{Check, validate_pair};
use crate::diagnostic::{Diagnostic, Subject};
use crate::directive::MappingDirective;
use crate::error::MappingError;
use crate::plan::{MappingPlan, ResolvedDirective};
use crate::symbols::{PartnerDeclaration, PropertyDescriptor, SymbolTable};
use crate::synth::{MappingPairResult, synthesize_pair};
use crate::types::{Location, TypeRef};

// ============================================================================
// Input
// ============================================================================

/// A directive together with the source property it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveSite {
    pub property: PropertyDescriptor,
    #[serde(default)]
    pub directive: MappingDirective,
}

impl DirectiveSite {
    pub fn new(property: PropertyDescriptor, directive: MappingDirective) -> Self {
        DirectiveSite {
            property,
            directive,
        }
    }
}

/// One pair to generate conversions for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRequest {
    pub source: TypeRef,
    pub target: TypeRef,
    /// Package receiving both generated units. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_package: Option<String>,
    #[serde(default)]
    pub directives: Vec<DirectiveSite>,
    /// Where the pair is declared in host source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl PairRequest {
    pub fn new(source: TypeRef, target: TypeRef, target_package: Option<String>) -> Self {
        PairRequest {
            source,
            target,
            target_package,
            directives: Vec::new(),
            location: None,
        }
    }

    /// Build a request from the source type's partner declaration.
    pub fn from_declaration(decl: &PartnerDeclaration) -> Self {
        PairRequest::new(decl.source.clone(), decl.target.clone(), decl.package.clone())
    }

    pub fn with_directives(mut self, directives: Vec<DirectiveSite>) -> Self {
        self.directives = directives;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// The target package, treating `""` as absent.
    pub fn package(&self) -> Option<&str> {
        self.target_package.as_deref().filter(|p| !p.is_empty())
    }

    /// What pair-level diagnostics attach to.
    pub fn subject(&self) -> Subject {
        Subject::Pair {
            source: self.source.to_string(),
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Result of processing one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// Both units were synthesized.
    Generated(MappingPairResult),
    /// Nothing was synthesized; every problem found is listed.
    Rejected(Vec<Diagnostic>),
}

impl PairOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, PairOutcome::Generated(_))
    }

    /// The generated units, if any.
    pub fn result(&self) -> Option<&MappingPairResult> {
        match self {
            PairOutcome::Generated(result) => Some(result),
            PairOutcome::Rejected(_) => None,
        }
    }

    /// The diagnostics; empty for a generated pair.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            PairOutcome::Generated(_) => &[],
            PairOutcome::Rejected(diagnostics) => diagnostics,
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Resolve, validate and synthesize one pair.
pub fn process_pair<T: SymbolTable + ?Sized>(table: &T, pair: &PairRequest) -> PairOutcome {
    let span = debug_span!("pair", source = %pair.source, target = %pair.target);
    let _guard = span.enter();
    debug!("Source type is: {}.", pair.source.simple_name());
    debug!("Target type is: {}.", pair.target.simple_name());

    let resolved: Vec<ResolvedDirective<'_>> = pair
        .directives
        .iter()
        .map(|site| ResolvedDirective::resolve(table, pair, site))
        .collect();

    let checks = validate_pair(table, pair, &resolved);
    if checks.has_errors() {
        let diagnostics = checks.into_errors();
        warn!(errors = diagnostics.len(), "pair rejected");
        return PairOutcome::Rejected(diagnostics);
    }

    // validation guarantees a package and fully resolved directives
    let plan = pair
        .package()
        .and_then(|package| MappingPlan::build(pair, package, &resolved));
    let Some(plan) = plan else {
        return PairOutcome::Rejected(vec![Diagnostic::error(
            &MappingError::MissingPackageName,
            pair.subject(),
            pair.location.clone(),
        )]);
    };

    let result = synthesize_pair(&plan);
    for unit in result.units() {
        info!(unit = %unit.name, package = %unit.package, direction = %unit.direction, "generated unit");
    }
    PairOutcome::Generated(result)
}

/// Process pairs one after another, keeping input order.
pub fn process_pairs<T: SymbolTable + ?Sized>(table: &T, pairs: &[PairRequest]) -> Vec<PairOutcome> {
    let outcomes = pairs.iter().map(|pair| process_pair(table, pair)).collect();
    reject_unit_collisions(pairs, outcomes)
}

/// Reject every generated pair with a unit whose package and file name were
/// already claimed by an earlier pair.
///
/// `outcomes[i]` is the outcome of `pairs[i]`.
pub fn reject_unit_collisions(
    pairs: &[PairRequest],
    outcomes: Vec<PairOutcome>,
) -> Vec<PairOutcome> {
    let mut claimed: HashMap<(String, String), &TypeRef> = HashMap::new();
    pairs
        .iter()
        .zip(outcomes)
        .map(|(pair, outcome)| {
            if let Some(result) = outcome.result() {
                let keys: Vec<_> = result
                    .units()
                    .iter()
                    .map(|unit| (unit.package.clone(), unit.file_name()))
                    .collect();
                let collisions: Vec<Diagnostic> = result
                    .units()
                    .iter()
                    .zip(&keys)
                    .filter_map(|(unit, key)| {
                        claimed.get(key).map(|other| {
                            let err = MappingError::DuplicateUnit {
                                package: unit.package.clone(),
                                unit: unit.name.clone(),
                                other: (*other).clone(),
                            };
                            Diagnostic::error(&err, pair.subject(), pair.location.clone())
                        })
                    })
                    .collect();
                if !collisions.is_empty() {
                    warn!(source = %pair.source, errors = collisions.len(), "pair rejected");
                    return PairOutcome::Rejected(collisions);
                }
                for key in keys {
                    claimed.insert(key, &pair.source);
                }
            }
            outcome
        })
        .collect()
}
