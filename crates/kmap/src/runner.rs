//! Pair processing over a whole manifest.
//!
//! Pairs are independent, so with more than one job they are processed on a
//! dedicated rayon pool. Outcomes always come back in manifest order, and a
//! pair whose units would overwrite an earlier pair's is rejected.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info};

use kmap_core::diagnostic::Diagnostic;
use kmap_core::error::KmapError;
use kmap_core::pair::{
    PairOutcome, PairRequest, process_pair, process_pairs, reject_unit_collisions,
};
use kmap_core::symbols::TypeTable;
use kmap_core::synth::GeneratedUnit;

/// Outcomes of every pair in a manifest.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcomes: Vec<PairOutcome>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_generated()).count()
    }

    /// Every diagnostic, in pair order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.outcomes
            .iter()
            .flat_map(|o| o.diagnostics().iter().cloned())
            .collect()
    }

    /// Every generated unit, in pair order (forward before reverse).
    pub fn units(&self) -> Vec<&GeneratedUnit> {
        self.outcomes
            .iter()
            .filter_map(PairOutcome::result)
            .flat_map(|result| result.units())
            .collect()
    }

    /// `Err(ValidationFailed)` when any pair was rejected.
    pub fn ensure_valid(&self) -> Result<(), KmapError> {
        match self.rejected() {
            0 => Ok(()),
            rejected => Err(KmapError::ValidationFailed {
                rejected,
                total: self.total(),
            }),
        }
    }
}

/// Process every pair, using `jobs` worker threads.
pub fn run_pairs(
    table: &TypeTable,
    pairs: &[PairRequest],
    jobs: usize,
) -> Result<RunReport, KmapError> {
    let outcomes = if jobs <= 1 || pairs.len() <= 1 {
        debug!(pairs = pairs.len(), "processing pairs sequentially");
        process_pairs(table, pairs)
    } else {
        debug!(pairs = pairs.len(), jobs, "processing pairs in parallel");
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| KmapError::internal(format!("failed to start worker pool: {}", e)))?;
        let outcomes: Vec<PairOutcome> = pool.install(|| {
            pairs
                .par_iter()
                .map(|pair| process_pair(table, pair))
                .collect()
        });
        reject_unit_collisions(pairs, outcomes)
    };

    let report = RunReport { outcomes };
    info!(
        total = report.total(),
        rejected = report.rejected(),
        "processed pairs"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmap_core::directive::MappingDirective;
    use kmap_core::pair::DirectiveSite;
    use kmap_core::symbols::{PropertyDescriptor, TypeDeclaration};
    use kmap_core::types::TypeRef;

    fn ty(name: &str) -> TypeRef {
        TypeRef::named(name)
    }

    fn table(count: usize) -> TypeTable {
        let mut table = TypeTable::new();
        for i in 0..count {
            for side in ["S", "T"] {
                table.insert_type(
                    TypeDeclaration::new(ty(&format!("p{i}.{side}{i}")))
                        .with_member(PropertyDescriptor::field("x", ty("kotlin.Int"))),
                );
            }
        }
        table
    }

    fn pairs(count: usize) -> Vec<PairRequest> {
        (0..count)
            .map(|i| {
                // every third pair has no package
                let package = (i % 3 != 0).then(|| format!("p{i}"));
                PairRequest::new(ty(&format!("p{i}.S{i}")), ty(&format!("p{i}.T{i}")), package)
                    .with_directives(vec![DirectiveSite::new(
                        PropertyDescriptor::field("x", ty("kotlin.Int")),
                        MappingDirective::new(),
                    )])
            })
            .collect()
    }

    #[test]
    fn parallel_matches_sequential_order() {
        let table = table(24);
        let pairs = pairs(24);
        let sequential = run_pairs(&table, &pairs, 1).unwrap();
        let parallel = run_pairs(&table, &pairs, 4).unwrap();
        assert_eq!(sequential.outcomes, parallel.outcomes);
    }

    #[test]
    fn report_counts_and_units() {
        let table = table(6);
        let report = run_pairs(&table, &pairs(6), 2).unwrap();
        assert_eq!(report.total(), 6);
        assert_eq!(report.rejected(), 2);
        assert_eq!(report.diagnostics().len(), 2);
        let names: Vec<_> = report.units().iter().map(|u| u.name.clone()).collect();
        assert_eq!(&names[..2], ["toT1", "toS1"]);
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn shared_unit_paths_are_rejected_in_parallel_too() {
        let mut table = table(0);
        for name in ["p.A", "p.B", "p.C", "p.V"] {
            table.insert_type(
                TypeDeclaration::new(ty(name))
                    .with_member(PropertyDescriptor::field("x", ty("kotlin.Int"))),
            );
        }
        let pairs: Vec<_> = ["p.A", "p.B", "p.C"]
            .iter()
            .map(|source| {
                PairRequest::new(ty(source), ty("p.V"), Some("p".to_string())).with_directives(
                    vec![DirectiveSite::new(
                        PropertyDescriptor::field("x", ty("kotlin.Int")),
                        MappingDirective::new(),
                    )],
                )
            })
            .collect();
        let report = run_pairs(&table, &pairs, 3).unwrap();
        assert_eq!(report.rejected(), 2);
        assert!(report.outcomes[0].is_generated());
        let paths: Vec<_> = report
            .units()
            .iter()
            .map(|u| format!("{}/{}", u.package, u.file_name()))
            .collect();
        assert_eq!(paths, vec!["p/toV.kt", "p/toA.kt"]);
    }

    #[test]
    fn ensure_valid_reports_rejections() {
        let table = table(3);
        let report = run_pairs(&table, &pairs(3), 1).unwrap();
        let err = report.ensure_valid().unwrap_err();
        assert_eq!(err.to_string(), "validation failed: 1 of 3 pair(s) rejected");
    }
}
