//! Code synthesis.
//!
//! A validated [`MappingPlan`] becomes two [`GeneratedUnit`]s, one per
//! [`Direction`]. Each unit holds a single conversion function: instantiate
//! the returned type, then assign each mapped property from the receiver.
//! The statements are kept as a small IR ([`Statement`], [`ValueExpr`]);
//! turning that IR into host source text lives in [`crate::render`].
//!
//! Naming: a unit and its function are named `to<Other>` after the simple
//! name of the type being produced. When source and target share a simple
//! name, the unit names get an `S` (forward) or `T` (reverse) prefix so the
//! two files cannot collide. Function names are never prefixed: nested
//! partner chains call them by their plain `to<Other>` name.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::partner::conversion_function_name;
use crate::path::AccessPath;
use crate::plan::{MappingPlan, PropertyPlan};
use crate::types::TypeRef;

/// Extension of generated unit files.
pub const UNIT_EXTENSION: &str = "kt";

// ============================================================================
// Content hash
// ============================================================================

/// SHA-256 of rendered unit text, hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Hash `data`.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// IR
// ============================================================================

/// Which way a conversion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Source to target.
    Forward,
    /// Target to source.
    Reverse,
}

impl Direction {
    /// Unit name prefix used when both types share a simple name.
    pub fn collision_prefix(self) -> &'static str {
        match self {
            Direction::Forward => "S",
            Direction::Reverse => "T",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Reverse => write!(f, "reverse"),
        }
    }
}

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueExpr {
    /// Copy the value read through the path.
    Read { path: AccessPath },
    /// Read the value, then pass it through a nested conversion function.
    Convert { path: AccessPath, function: String },
}

impl ValueExpr {
    /// The getter path being read.
    pub fn path(&self) -> &AccessPath {
        match self {
            ValueExpr::Read { path } | ValueExpr::Convert { path, .. } => path,
        }
    }
}

/// One statement of a conversion body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// Write `value` through the setter path of the new instance.
    Assign { setter: AccessPath, value: ValueExpr },
}

/// A conversion function: `fun <receiver>.<name>(): <returns>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionFunction {
    pub name: String,
    pub receiver: TypeRef,
    pub returns: TypeRef,
    pub statements: Vec<Statement>,
}

/// An imported top-level function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Import {
    pub package: String,
    pub name: String,
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// One generated source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    /// Package the unit is declared in.
    pub package: String,
    /// Unit (file) name, without extension.
    pub name: String,
    pub direction: Direction,
    /// Deduplicated and sorted; never includes the unit's own package.
    pub imports: Vec<Import>,
    pub function: ConversionFunction,
}

impl GeneratedUnit {
    /// File name of the unit, e.g. `toValue.kt`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, UNIT_EXTENSION)
    }

    /// Hash of the rendered text.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::compute(self.render().as_bytes())
    }
}

/// Both units generated for one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingPairResult {
    pub source: TypeRef,
    pub target: TypeRef,
    pub forward: GeneratedUnit,
    pub reverse: GeneratedUnit,
}

impl MappingPairResult {
    /// Forward unit first, then reverse.
    pub fn units(&self) -> [&GeneratedUnit; 2] {
        [&self.forward, &self.reverse]
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// Synthesize both directions of a validated plan.
pub fn synthesize_pair(plan: &MappingPlan) -> MappingPairResult {
    MappingPairResult {
        source: plan.source.clone(),
        target: plan.target.clone(),
        forward: synthesize(plan, Direction::Forward),
        reverse: synthesize(plan, Direction::Reverse),
    }
}

/// Synthesize one direction of a validated plan.
pub fn synthesize(plan: &MappingPlan, direction: Direction) -> GeneratedUnit {
    let (receiver, returns) = match direction {
        Direction::Forward => (&plan.source, &plan.target),
        Direction::Reverse => (&plan.target, &plan.source),
    };

    let function_name = conversion_function_name(returns);
    let name = if plan.has_simple_name_collision() {
        format!("{}{}", direction.collision_prefix(), function_name)
    } else {
        function_name.clone()
    };

    let statements = plan
        .properties
        .iter()
        .map(|property| assignment(property, direction))
        .collect();

    GeneratedUnit {
        package: plan.package.clone(),
        name,
        direction,
        imports: imports(plan, direction),
        function: ConversionFunction {
            name: function_name,
            receiver: receiver.clone(),
            returns: returns.clone(),
            statements,
        },
    }
}

fn assignment(property: &PropertyPlan, direction: Direction) -> Statement {
    let (getter, setter) = match direction {
        Direction::Forward => (&property.source_get, &property.target_set),
        Direction::Reverse => (&property.target_get, &property.source_set),
    };
    let value = match &property.partner {
        Some(chain) => ValueExpr::Convert {
            path: getter.clone(),
            function: match direction {
                Direction::Forward => chain.forward_function(),
                Direction::Reverse => chain.reverse_function(),
            },
        },
        None => ValueExpr::Read {
            path: getter.clone(),
        },
    };
    Statement::Assign {
        setter: setter.clone(),
        value,
    }
}

/// Nested conversion functions living outside the unit's package.
fn imports(plan: &MappingPlan, direction: Direction) -> Vec<Import> {
    plan.properties
        .iter()
        .filter_map(|property| property.partner.as_ref())
        .filter_map(|chain| {
            let package = chain.package.as_deref().filter(|p| !p.is_empty())?;
            if package == plan.package {
                return None;
            }
            let name = match direction {
                Direction::Forward => chain.forward_function(),
                Direction::Reverse => chain.reverse_function(),
            };
            Some(Import {
                package: package.to_string(),
                name,
            })
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
