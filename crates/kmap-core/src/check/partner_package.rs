//! Packages: the pair names a valid package for its units, and every partner
//! chain it routes through names the package of the nested units.

use crate::diagnostic::Diagnostic;
use crate::error::MappingError;
use crate::pair::PairRequest;
use crate::plan::ResolvedDirective;

use super::Check;

/// Rejects missing or malformed packages.
#[derive(Debug, Clone, Default)]
pub struct PartnerPackageCheck {
    errors: Vec<Diagnostic>,
}

impl PartnerPackageCheck {
    pub fn run(pair: &PairRequest, resolved: &[ResolvedDirective<'_>]) -> Self {
        let mut errors = Vec::new();
        if let Some(err) = package_error(pair.package()) {
            errors.push(Diagnostic::error(&err, pair.subject(), pair.location.clone()));
        }
        for directive in resolved {
            let Some(chain) = &directive.partner else {
                continue;
            };
            let package = chain.package.as_deref().filter(|p| !p.is_empty());
            if let Some(err) = package_error(package) {
                errors.push(Diagnostic::error(
                    &err,
                    directive.subject(),
                    directive.location(),
                ));
            }
        }
        PartnerPackageCheck { errors }
    }
}

impl Check for PartnerPackageCheck {
    fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}

fn package_error(package: Option<&str>) -> Option<MappingError> {
    match package {
        None => Some(MappingError::MissingPackageName),
        Some(package) if !is_valid_package(package) => Some(MappingError::InvalidPackageName {
            package: package.to_string(),
        }),
        Some(_) => None,
    }
}

/// Whether `package` is a dot-separated list of identifiers, e.g. `crm.mapping`.
pub fn is_valid_package(package: &str) -> bool {
    package.split('.').all(|segment| {
        let mut chars = segment.chars();
        matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::MappingDirective;
    use crate::pair::DirectiveSite;
    use crate::symbols::{PartnerDeclaration, PropertyDescriptor, TypeDeclaration, TypeTable};
    use crate::types::{Location, TypeRef};

    fn pair(package: Option<&str>) -> PairRequest {
        PairRequest::new(
            TypeRef::named("a.Scalar"),
            TypeRef::named("a.Value"),
            package.map(str::to_string),
        )
    }

    fn run(pair: &PairRequest) -> PartnerPackageCheck {
        PartnerPackageCheck::run(pair, &[])
    }

    mod pair_package {
        use super::*;

        #[test]
        fn present_package_passes() {
            assert!(!run(&pair(Some("a"))).has_errors());
            assert!(!run(&pair(Some("crm.mapping_v2"))).has_errors());
        }

        #[test]
        fn missing_package_is_reported_on_pair() {
            let check = run(&pair(None).with_location(Location::new("a/Scalar.kt", 3, 1)));
            let errors = check.errors();
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors[0].message,
                "MapPartner doesn't contain parameter packageName."
            );
            assert_eq!(errors[0].subject.to_string(), "a.Scalar");
            assert_eq!(errors[0].location, Some(Location::new("a/Scalar.kt", 3, 1)));
        }

        #[test]
        fn empty_package_counts_as_missing() {
            let check = run(&pair(Some("")));
            assert_eq!(check.errors()[0].code, "missing_package_name");
        }

        #[test]
        fn path_like_packages_are_rejected() {
            for package in ["gen./etc/cron", "..", "a..b", "a.", "1st", "a/b", "a b"] {
                let check = run(&pair(Some(package)));
                assert_eq!(check.errors().len(), 1, "{}", package);
                assert_eq!(check.errors()[0].code, "invalid_package_name");
            }
        }
    }

    mod nested_partner_package {
        use super::*;

        fn check(partner_package: Option<&str>) -> PartnerPackageCheck {
            let mut table = TypeTable::new();
            table.insert_type(TypeDeclaration::new(TypeRef::named("a.Scalar")).with_member(
                PropertyDescriptor::field("inner", TypeRef::named("b.Inner")),
            ));
            table.insert_type(TypeDeclaration::new(TypeRef::named("a.Value")).with_member(
                PropertyDescriptor::field("inner", TypeRef::named("b.InnerDto")),
            ));
            table.insert_partner(PartnerDeclaration::new(
                TypeRef::named("b.Inner"),
                TypeRef::named("b.InnerDto"),
                partner_package.map(str::to_string),
            ));
            let pair = pair(Some("a")).with_directives(vec![DirectiveSite::new(
                PropertyDescriptor::field("inner", TypeRef::named("b.Inner")),
                MappingDirective::new(),
            )]);
            let resolved: Vec<_> = pair
                .directives
                .iter()
                .map(|site| ResolvedDirective::resolve(&table, &pair, site))
                .collect();
            PartnerPackageCheck::run(&pair, &resolved)
        }

        #[test]
        fn declared_package_passes() {
            assert!(!check(Some("b")).has_errors());
        }

        #[test]
        fn missing_package_is_reported_on_property() {
            let check = check(None);
            assert_eq!(check.errors().len(), 1);
            assert_eq!(check.errors()[0].code, "missing_package_name");
            assert_eq!(check.errors()[0].subject.to_string(), "a.Scalar.inner");
        }

        #[test]
        fn malformed_package_is_reported() {
            assert_eq!(
                check(Some("b/../x")).errors()[0].code,
                "invalid_package_name"
            );
        }
    }
}
