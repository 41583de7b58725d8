//! Directive shape: a name override is redundant once both accessors of its
//! side are given explicitly.

use crate::diagnostic::Diagnostic;
use crate::directive::{MappingDirective, Side};
use crate::error::MappingError;
use crate::plan::ResolvedDirective;

use super::Check;

#[derive(Debug, Clone, Default)]
pub struct DirectiveShapeCheck {
    errors: Vec<Diagnostic>,
}

impl DirectiveShapeCheck {
    pub fn run(resolved: &[ResolvedDirective<'_>]) -> Self {
        let errors = resolved
            .iter()
            .flat_map(|directive| {
                redundant_sides(&directive.site.directive)
                    .into_iter()
                    .map(move |side| {
                        Diagnostic::error(
                            &MappingError::RedundantDirectiveShape { side },
                            directive.subject(),
                            directive.location(),
                        )
                    })
            })
            .collect();
        DirectiveShapeCheck { errors }
    }
}

impl Check for DirectiveShapeCheck {
    fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}

/// Sides whose name override is shadowed, source side first.
fn redundant_sides(directive: &MappingDirective) -> Vec<Side> {
    let shadowed = |value: &str, get: &str, set: &str| {
        !value.is_empty() && !get.is_empty() && !set.is_empty()
    };
    let mut sides = Vec::new();
    if shadowed(&directive.this_value, &directive.this_get, &directive.this_set) {
        sides.push(Side::Source);
    }
    if shadowed(&directive.value, &directive.target_get, &directive.target_set) {
        sides.push(Side::Target);
    }
    sides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_directive_is_fine() {
        assert!(redundant_sides(&MappingDirective::new()).is_empty());
    }

    #[test]
    fn value_with_one_accessor_is_fine() {
        let directive = MappingDirective::new()
            .with_value("y")
            .with_target_get("z()");
        assert!(redundant_sides(&directive).is_empty());
    }

    #[test]
    fn value_with_both_accessors_is_redundant() {
        let directive = MappingDirective::new()
            .with_value("y")
            .with_target_get("a")
            .with_target_set("b");
        assert_eq!(redundant_sides(&directive), vec![Side::Target]);
    }

    #[test]
    fn both_sides_reported() {
        let directive = MappingDirective::new()
            .with_value("y")
            .with_target_get("a")
            .with_target_set("b")
            .with_this_value("y")
            .with_this_get("a")
            .with_this_set("b");
        assert_eq!(redundant_sides(&directive), vec![Side::Source, Side::Target]);
    }

    #[test]
    fn sides_are_independent() {
        // source-side accessors do not make the target override redundant
        let directive = MappingDirective::new()
            .with_value("y")
            .with_this_get("a")
            .with_this_set("b");
        assert!(redundant_sides(&directive).is_empty());
    }
}
