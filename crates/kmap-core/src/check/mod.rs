//! Validation pipeline.
//!
//! Every check is run over the whole pair and keeps every problem it finds;
//! nothing short-circuits. The checks, in pipeline order:
//!
//! 1. [`PartnerPackageCheck`]: the pair and its partner chains name valid packages
//! 2. [`DirectiveShapeCheck`]: no name override shadowed by both accessors
//! 3. [`PropertyExistsCheck`]: every path segment resolved
//! 4. [`CompatibleTypesCheck`]: mapped leaves have compatible types
//!
//! [`Checks`] combines any number of checks into one. A pair with any error
//! produces no code at all.

mod compatible_types;
mod directive_shape;
mod partner_package;
mod property_exists;

pub use compatible_types::{CompatibleTypesCheck, types_compatible};
pub use directive_shape::DirectiveShapeCheck;
pub use partner_package::{PartnerPackageCheck, is_valid_package};
pub use property_exists::PropertyExistsCheck;

use crate::diagnostic::Diagnostic;
use crate::pair::PairRequest;
use crate::plan::ResolvedDirective;
use crate::symbols::SymbolTable;

/// A finished validation pass.
pub trait Check {
    /// Every problem found, in discovery order.
    fn errors(&self) -> &[Diagnostic];

    /// Whether the pass found anything.
    fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }
}

/// Several checks combined into one.
///
/// Errors are concatenated in the order the checks were added.
#[derive(Debug, Clone, Default)]
pub struct Checks {
    errors: Vec<Diagnostic>,
}

impl Checks {
    /// An empty combination; it has no errors.
    pub fn new() -> Self {
        Checks::default()
    }

    /// Append the errors of `check`.
    pub fn with(mut self, check: impl Check) -> Self {
        self.errors.extend_from_slice(check.errors());
        self
    }

    /// Consume into the collected errors.
    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }
}

impl Check for Checks {
    fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}

impl FromIterator<Box<dyn Check>> for Checks {
    fn from_iter<I: IntoIterator<Item = Box<dyn Check>>>(iter: I) -> Self {
        let errors = iter
            .into_iter()
            .flat_map(|check| check.errors().to_vec())
            .collect();
        Checks { errors }
    }
}

/// Run the full pipeline over one pair.
pub fn validate_pair<T: SymbolTable + ?Sized>(
    table: &T,
    pair: &PairRequest,
    resolved: &[ResolvedDirective<'_>],
) -> Checks {
    Checks::new()
        .with(PartnerPackageCheck::run(pair, resolved))
        .with(DirectiveShapeCheck::run(resolved))
        .with(PropertyExistsCheck::run(resolved))
        .with(CompatibleTypesCheck::run(table, resolved))
}
