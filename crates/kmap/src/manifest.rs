//! Manifest loading.
//!
//! A manifest is a JSON snapshot of what the host discovered: every declared
//! type with its members, every partner declaration, and the pairs to
//! generate with their directives.
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "basic.Scalar", "members": [{ "name": "x", "declared_type": "kotlin.Int" }] },
//!     { "name": "basic.Value",  "members": [{ "name": "x", "declared_type": "kotlin.Int" }] }
//!   ],
//!   "partners": [{ "source": "basic.Scalar", "target": "basic.Value", "package": "basic" }],
//!   "pairs": [{
//!     "source": "basic.Scalar",
//!     "target": "basic.Value",
//!     "targetPackage": "basic",
//!     "directives": [{ "property": { "name": "x", "declared_type": "kotlin.Int" } }]
//!   }]
//! }
//! ```
//!
//! When `pairs` is absent, one pair per partner declaration is generated with
//! no directives.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use kmap_core::error::KmapError;
use kmap_core::pair::PairRequest;
use kmap_core::symbols::TypeTable;

/// A loaded manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub table: TypeTable,
    pub pairs: Vec<PairRequest>,
}

/// Wire form: the table's fields and the pairs side by side.
#[derive(Deserialize)]
struct ManifestData {
    #[serde(flatten)]
    table: TypeTable,
    #[serde(default)]
    pairs: Option<Vec<PairRequest>>,
}

impl Manifest {
    /// Parse manifest text; `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self, KmapError> {
        let data: ManifestData =
            serde_json::from_str(text).map_err(|e| KmapError::InvalidManifest {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        let pairs = match data.pairs {
            Some(pairs) => pairs,
            None => data
                .table
                .partners()
                .map(PairRequest::from_declaration)
                .collect(),
        };
        Ok(Manifest {
            table: data.table,
            pairs,
        })
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, KmapError> {
        let origin = path.display().to_string();
        if !path.is_file() {
            return Err(KmapError::file_not_found(origin));
        }
        let text = fs::read_to_string(path).map_err(|e| KmapError::InvalidManifest {
            path: origin.clone(),
            message: e.to_string(),
        })?;
        let manifest = Self::parse(&text, &origin)?;
        debug!(
            path = %origin,
            types = manifest.table.type_count(),
            pairs = manifest.pairs.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }
}
