//! Command implementations for the kmap CLI.
//!
//! - `generate` - validate every pair and write the units of the valid ones
//! - `check` - validate only, listing every diagnostic
//! - `verify` - compare the units that would be generated with those on disk
//!
//! Each command writes its report to the given writer, then returns
//! `Err(ValidationFailed)` or `Err(OutOfDate)` when something was wrong. Those
//! two errors are already covered by the report; the caller only turns them
//! into an exit code.

use std::io::Write;

use clap::ValueEnum;

use kmap_core::diagnostic::Diagnostic;
use kmap_core::error::KmapError;
use kmap_core::output::{
    CheckResponse, GenerateResponse, UnitInfo, UnitState, VerifyResponse, emit_response,
};

use crate::config::ResolvedConfig;
use crate::manifest::Manifest;
use crate::runner::{RunReport, run_pairs};
use crate::writer::{display_path, unit_path, verify_units, write_units};

/// Output format for command reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// JSON response.
    Json,
}

fn io_error(e: std::io::Error) -> KmapError {
    KmapError::internal(format!("failed to write output: {}", e))
}

fn load_and_run(config: &ResolvedConfig) -> Result<RunReport, KmapError> {
    let manifest = Manifest::load(&config.manifest.value)?;
    run_pairs(&manifest.table, &manifest.pairs, config.jobs.value)
}

fn write_diagnostics(out: &mut impl Write, diagnostics: &[Diagnostic]) -> Result<(), KmapError> {
    for diagnostic in diagnostics {
        writeln!(out, "{}", diagnostic).map_err(io_error)?;
    }
    Ok(())
}

// ============================================================================
// generate
// ============================================================================

/// Generate units for every valid pair.
///
/// Valid pairs are written even when others are rejected.
pub fn run_generate(
    config: &ResolvedConfig,
    dry_run: bool,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), KmapError> {
    let report = load_and_run(config)?;
    let units = report.units();
    let diagnostics = report.diagnostics();

    let files = if dry_run {
        units
            .iter()
            .map(|u| unit_path(u).map(|path| display_path(&path)))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        write_units(&config.out_dir.value, &units)?
    };

    match format {
        OutputFormat::Json => {
            let infos = units
                .iter()
                .zip(&files)
                .map(|(unit, file)| {
                    let info = UnitInfo::from_unit(unit, file.clone());
                    if dry_run {
                        info.with_content(unit.render())
                    } else {
                        info
                    }
                })
                .collect();
            let response = GenerateResponse::new(
                report.total(),
                report.rejected(),
                !dry_run,
                infos,
                diagnostics,
            );
            emit_response(&response, out).map_err(io_error)?;
        }
        OutputFormat::Text => {
            for (unit, file) in units.iter().zip(&files) {
                if dry_run {
                    writeln!(out, "// {}", file).map_err(io_error)?;
                    write!(out, "{}", unit.render()).map_err(io_error)?;
                    writeln!(out).map_err(io_error)?;
                } else {
                    writeln!(out, "wrote {}", file).map_err(io_error)?;
                }
            }
            write_diagnostics(out, &diagnostics)?;
            writeln!(
                out,
                "generated {} unit(s) from {} of {} pair(s)",
                units.len(),
                report.total() - report.rejected(),
                report.total()
            )
            .map_err(io_error)?;
        }
    }

    report.ensure_valid()
}

// ============================================================================
// check
// ============================================================================

/// Validate every pair without generating anything.
pub fn run_check(
    config: &ResolvedConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), KmapError> {
    let report = load_and_run(config)?;
    let diagnostics = report.diagnostics();

    match format {
        OutputFormat::Json => {
            let response = CheckResponse::new(report.total(), report.rejected(), diagnostics);
            emit_response(&response, out).map_err(io_error)?;
        }
        OutputFormat::Text => {
            write_diagnostics(out, &diagnostics)?;
            writeln!(
                out,
                "checked {} pair(s): {} rejected",
                report.total(),
                report.rejected()
            )
            .map_err(io_error)?;
        }
    }

    report.ensure_valid()
}

// ============================================================================
// verify
// ============================================================================

/// Compare would-be units with the files under the output directory.
pub fn run_verify(
    config: &ResolvedConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), KmapError> {
    let report = load_and_run(config)?;
    let units = report.units();
    let entries = verify_units(&config.out_dir.value, &units)?;
    let response = VerifyResponse::new(entries, report.diagnostics());

    match format {
        OutputFormat::Json => emit_response(&response, out).map_err(io_error)?,
        OutputFormat::Text => {
            for entry in &response.units {
                let state = match entry.state {
                    UnitState::Fresh => "fresh",
                    UnitState::Stale => "stale",
                    UnitState::Missing => "missing",
                };
                writeln!(out, "{:<8}{}", state, entry.file).map_err(io_error)?;
            }
            write_diagnostics(out, &response.diagnostics)?;
        }
    }

    report.ensure_valid()?;
    match response.out_of_date() {
        0 => Ok(()),
        stale => Err(KmapError::OutOfDate {
            stale,
            total: response.units.len(),
        }),
    }
}
