//! Structural model of component data.
//!
//! A [`Shape`] is inferred from initial values and property types and is
//! used at build time to check that observer paths address something real.
//!
//! Resolution is bounded: a path with more segments than `max_depth`, or a
//! value nested deeper than `max_depth`, resolves to [`Shape::Any`].  This is
//! a deliberate loss of precision in exchange for bounded work.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{DataPath, Segment};

#[derive(Clone, PartialEq, Debug)]
pub enum Shape {
    /// Unconstrained; every sub-path resolves.
    Any,
    Null,
    Bool,
    Number,
    String,
    /// Homogeneous array; heterogeneous or empty arrays have `Any` elements.
    Array(Box<Shape>),
    Object(IndexMap<String, Shape>),
}

impl Shape {
    /// Infer the shape of `value`, looking at most `max_depth` levels deep.
    pub fn infer(value: &Value, max_depth: usize) -> Shape {
        if max_depth == 0 {
            return Shape::Any;
        }
        match value {
            Value::Null => Shape::Null,
            Value::Bool(_) => Shape::Bool,
            Value::Number(_) => Shape::Number,
            Value::String(_) => Shape::String,
            Value::Array(items) => {
                let mut shapes = items.iter().map(|v| Shape::infer(v, max_depth - 1));
                let element = match shapes.next() {
                    Some(first) if shapes.all(|s| s == first) => first,
                    _ => Shape::Any,
                };
                Shape::Array(Box::new(element))
            }
            Value::Object(map) => Shape::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Shape::infer(v, max_depth - 1)))
                    .collect(),
            ),
        }
    }

    /// Resolve `path` to the shape it addresses.
    ///
    /// Returns `None` when the path names a field or index that cannot
    /// exist.  `Null` is treated like `Any`, since `null` commonly stands in
    /// for "not loaded yet".
    pub fn resolve(&self, path: &DataPath, max_depth: usize) -> Option<Shape> {
        if path.depth() > max_depth {
            return Some(Shape::Any);
        }
        let mut current = self;
        for segment in path.segments() {
            current = match (current, segment) {
                (Shape::Any | Shape::Null, _) => return Some(Shape::Any),
                (Shape::Object(fields), Segment::Field(name)) => fields.get(name)?,
                (Shape::Array(element), Segment::Index(_)) => element,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    /// Name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Any => "any",
            Shape::Null => "null",
            Shape::Bool => "boolean",
            Shape::Number => "number",
            Shape::String => "string",
            Shape::Array(_) => "array",
            Shape::Object(_) => "object",
        }
    }
}
