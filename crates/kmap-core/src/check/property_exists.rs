//! Existence: every segment of every access path names a declared member.
//!
//! A directive whose getter and setter resolve to the same missing name would
//! otherwise report the same problem twice; identical messages within one
//! directive are reported once.

use crate::diagnostic::Diagnostic;
use crate::error::MappingError;
use crate::plan::ResolvedDirective;

use super::Check;

#[derive(Debug, Clone, Default)]
pub struct PropertyExistsCheck {
    errors: Vec<Diagnostic>,
}

impl PropertyExistsCheck {
    pub fn run(resolved: &[ResolvedDirective<'_>]) -> Self {
        let mut errors = Vec::new();
        for directive in resolved {
            let mut seen: Vec<String> = Vec::new();
            for (side, missing) in directive.unresolved() {
                let err = MappingError::UnresolvedMember {
                    side,
                    owner: missing.owner.clone(),
                    name: missing.name.clone(),
                    enclosed: missing.enclosed.clone(),
                };
                let message = err.to_string();
                if seen.contains(&message) {
                    continue;
                }
                seen.push(message);
                errors.push(Diagnostic::error(
                    &err,
                    directive.subject(),
                    directive.location(),
                ));
            }
        }
        PropertyExistsCheck { errors }
    }
}

impl Check for PropertyExistsCheck {
    fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}
