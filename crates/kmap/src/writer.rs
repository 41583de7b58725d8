//! Writing generated units to disk and checking them for staleness.
//!
//! A unit lands at `<out_dir>/<package as path>/<name>.kt`, e.g.
//! `generated/basic/nested/toValue.kt`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use kmap_core::check::is_valid_package;
use kmap_core::error::KmapError;
use kmap_core::output::{UnitState, VerifyEntry};
use kmap_core::synth::{ContentHash, GeneratedUnit};

/// Path of `unit` relative to the output directory.
///
/// The package must be a dotted identifier so the path stays under the
/// output directory.
pub fn unit_path(unit: &GeneratedUnit) -> Result<PathBuf, KmapError> {
    if !unit.package.is_empty() && !is_valid_package(&unit.package) {
        return Err(KmapError::write(
            unit.package.clone(),
            "package is not a valid package name",
        ));
    }
    let mut path: PathBuf = unit.package.split('.').filter(|s| !s.is_empty()).collect();
    path.push(unit.file_name());
    Ok(path)
}

/// Display form of a relative unit path, always with `/` separators.
pub fn display_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write every unit under `out_dir`, returning the relative paths written.
///
/// Files whose content is already up to date are left untouched.
pub fn write_units(out_dir: &Path, units: &[&GeneratedUnit]) -> Result<Vec<String>, KmapError> {
    let mut written = Vec::with_capacity(units.len());
    for unit in units {
        let relative = unit_path(unit)?;
        let path = out_dir.join(&relative);
        let content = unit.render();

        if fs::read(&path).is_ok_and(|existing| existing == content.as_bytes()) {
            debug!(path = %path.display(), "unit unchanged");
            written.push(display_path(&relative));
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| KmapError::write(parent.display().to_string(), e.to_string()))?;
        }
        fs::write(&path, &content)
            .map_err(|e| KmapError::write(path.display().to_string(), e.to_string()))?;
        info!(path = %path.display(), "wrote unit");
        written.push(display_path(&relative));
    }
    Ok(written)
}

/// Compare every unit against what is on disk under `out_dir`.
pub fn verify_units(
    out_dir: &Path,
    units: &[&GeneratedUnit],
) -> Result<Vec<VerifyEntry>, KmapError> {
    units
        .iter()
        .map(|unit| {
            let relative = unit_path(unit)?;
            let expected_hash = unit.content_hash();
            let actual_hash = fs::read(out_dir.join(&relative))
                .ok()
                .map(|bytes| ContentHash::compute(&bytes));
            let state = match &actual_hash {
                None => UnitState::Missing,
                Some(actual) if *actual == expected_hash => UnitState::Fresh,
                Some(_) => UnitState::Stale,
            };
            Ok(VerifyEntry {
                file: display_path(&relative),
                state,
                expected_hash,
                actual_hash,
            })
        })
        .collect()
}
