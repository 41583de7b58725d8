//! A tiny interpreter for synthesized conversion functions.
//!
//! Objects are maps from member name to value, tagged with their type. A
//! method accessor and a field with the same name share one slot, so
//! `theAge()` reads what `theAge(v)` wrote. Nested conversion calls are
//! dispatched on (receiver type, function name) across every unit loaded.

use std::collections::BTreeMap;

use kmap_core::path::AccessPath;
use kmap_core::synth::{ConversionFunction, MappingPairResult, Statement, ValueExpr};

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
    Object(Object),
}

/// An instance of a declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub ty: String,
    pub fields: BTreeMap<String, Value>,
}

impl Object {
    pub fn new(ty: &str) -> Self {
        Object {
            ty: ty.to_string(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&Value::Null)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

/// Runs conversion functions from a set of generated pairs.
pub struct Evaluator<'a> {
    functions: Vec<&'a ConversionFunction>,
}

impl<'a> Evaluator<'a> {
    pub fn new(results: &[&'a MappingPairResult]) -> Self {
        let functions = results
            .iter()
            .copied()
            .flat_map(MappingPairResult::units)
            .map(|unit| &unit.function)
            .collect();
        Evaluator { functions }
    }

    /// Call `function` with `receiver`; `null` maps to `null`.
    pub fn call(&self, function: &str, receiver: &Value) -> Value {
        let Value::Object(object) = receiver else {
            return Value::Null;
        };
        let func = self
            .functions
            .iter()
            .find(|f| f.name == function && f.receiver.qualified_name() == object.ty)
            .unwrap_or_else(|| panic!("no function {function} on {}", object.ty));
        self.run(func, object)
    }

    fn run(&self, func: &ConversionFunction, receiver: &Object) -> Value {
        let mut out = Object::new(func.returns.qualified_name());
        for statement in &func.statements {
            let Statement::Assign { setter, value } = statement;
            let value = match value {
                ValueExpr::Read { path } => read(receiver, path),
                ValueExpr::Convert { path, function } => self.call(function, &read(receiver, path)),
            };
            write(&mut out, setter, value);
        }
        Value::Object(out)
    }
}

fn read(object: &Object, path: &AccessPath) -> Value {
    let mut current = Value::Object(object.clone());
    for segment in path.segments() {
        current = match current {
            Value::Object(obj) => obj.get(&segment.name).clone(),
            _ => Value::Null,
        };
    }
    current
}

fn write(object: &mut Object, path: &AccessPath, value: Value) {
    let segments = path.segments();
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };
    let mut current = object;
    for segment in parents {
        let slot = current
            .fields
            .entry(segment.name.clone())
            .or_insert_with(|| Value::Object(Object::new(segment.declared_type.qualified_name())));
        if !matches!(slot, Value::Object(_)) {
            *slot = Value::Object(Object::new(segment.declared_type.qualified_name()));
        }
        current = match slot {
            Value::Object(obj) => obj,
            _ => unreachable!("slot was just made an object"),
        };
    }
    current.fields.insert(leaf.name.clone(), value);
}
