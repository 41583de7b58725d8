//! Rendering generated units as host source text.
//!
//! ```text
//! package basic.nested
//!
//! import basic.other.toInnerDto
//!
//! fun Scalar.toValue(): Value =
//!     Value().also {
//!         it.x = x
//!         it.theAge(age)
//!         it.inner = inner.toInnerDto()
//!     }
//! ```
//!
//! Types in the unit's own package are written by simple name; everything
//! else is fully qualified. When receiver and returned type share a simple
//! name the receiver is always qualified.

use crate::path::{AccessPath, AccessSegment};
use crate::synth::{GeneratedUnit, Statement, ValueExpr};
use crate::types::TypeRef;

const INDENT: &str = "    ";

impl GeneratedUnit {
    /// Render the unit as source text, ending with a newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.package.is_empty() {
            out.push_str(&format!("package {}\n\n", self.package));
        }
        if !self.imports.is_empty() {
            for import in &self.imports {
                out.push_str(&format!("import {}\n", import));
            }
            out.push('\n');
        }

        let function = &self.function;
        let returns = type_name(&function.returns, &self.package);
        let receiver = if function.receiver.simple_name() == function.returns.simple_name() {
            function.receiver.to_string()
        } else {
            type_name(&function.receiver, &self.package)
        };
        out.push_str(&format!("fun {}.{}(): {} =", receiver, function.name, returns));
        if function.statements.is_empty() {
            out.push_str(&format!(" {}()\n", returns));
            return out;
        }

        out.push('\n');
        out.push_str(&format!("{INDENT}{}().also {{\n", returns));
        for statement in &function.statements {
            out.push_str(&format!("{INDENT}{INDENT}{}\n", render_statement(statement)));
        }
        out.push_str(&format!("{INDENT}}}\n"));
        out
    }
}

/// Render one statement, e.g. `it.x = x` or `it.theAge(age)`.
pub fn render_statement(statement: &Statement) -> String {
    match statement {
        Statement::Assign { setter, value } => {
            let value = render_value(value);
            let segments = setter.segments();
            let (leaf, parents) = match segments.split_last() {
                Some(split) => split,
                None => return String::new(),
            };
            let mut target = String::from("it");
            for segment in parents {
                target.push('.');
                target.push_str(&read_segment(segment));
            }
            if leaf.is_method {
                format!("{}.{}({})", target, leaf.name, value)
            } else {
                format!("{}.{} = {}", target, leaf.name, value)
            }
        }
    }
}

/// Render a right-hand side, e.g. `size.width` or `inner.toInnerDto()`.
pub fn render_value(value: &ValueExpr) -> String {
    match value {
        ValueExpr::Read { path } => read_path(path),
        ValueExpr::Convert { path, function } => format!("{}.{}()", read_path(path), function),
    }
}

fn read_path(path: &AccessPath) -> String {
    path.segments()
        .iter()
        .map(read_segment)
        .collect::<Vec<_>>()
        .join(".")
}

fn read_segment(segment: &AccessSegment) -> String {
    if segment.is_method {
        format!("{}()", segment.name)
    } else {
        segment.name.clone()
    }
}

/// Name `ty` as seen from inside `package`.
fn type_name(ty: &TypeRef, package: &str) -> String {
    let base = if ty.package() == package {
        ty.simple_name()
    } else {
        ty.qualified_name()
    };
    if ty.args.is_empty() {
        return base.to_string();
    }
    let args = ty
        .args
        .iter()
        .map(|arg| type_name(arg, package))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}<{}>", base, args)
}
