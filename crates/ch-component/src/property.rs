//! Typed property declarations.

use std::fmt;

use ch_path::Shape;
use serde_json::{Value, json};

/// The type of a property, as understood by hosts.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    /// Accepts any value.
    Any,
}

impl PropertyType {
    /// `true` if `value` may be stored in a property of this type.
    /// `Object` properties also accept `null`.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            PropertyType::String => value.is_string(),
            PropertyType::Number => value.is_number(),
            PropertyType::Boolean => value.is_boolean(),
            PropertyType::Object => value.is_object() || value.is_null(),
            PropertyType::Array => value.is_array(),
            PropertyType::Any => true,
        }
    }

    /// Initial value used when a declaration gives none.
    pub fn default_value(self) -> Value {
        match self {
            PropertyType::String => json!(""),
            PropertyType::Number => json!(0),
            PropertyType::Boolean => json!(false),
            PropertyType::Array => json!([]),
            PropertyType::Object | PropertyType::Any => Value::Null,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Object => "object",
            PropertyType::Array => "array",
            PropertyType::Any => "any",
        };
        f.write_str(name)
    }
}

/// A property declaration: its type and optional default.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDef {
    pub ty:    PropertyType,
    pub value: Option<Value>,
}

impl PropertyDef {
    pub fn new(ty: PropertyType) -> Self {
        Self { ty, value: None }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn initial_value(&self) -> Value {
        self.value.clone().unwrap_or_else(|| self.ty.default_value())
    }

    /// Structural shape used to validate observer paths.
    pub(crate) fn shape(&self, max_depth: usize) -> Shape {
        match (self.ty, &self.value) {
            (PropertyType::String, _) => Shape::String,
            (PropertyType::Number, _) => Shape::Number,
            (PropertyType::Boolean, _) => Shape::Bool,
            (PropertyType::Object | PropertyType::Array, Some(v)) if !v.is_null() => {
                Shape::infer(v, max_depth)
            }
            (PropertyType::Array, _) => Shape::Array(Box::new(Shape::Any)),
            (PropertyType::Object | PropertyType::Any, _) => Shape::Any,
        }
    }
}

impl From<PropertyType> for PropertyDef {
    fn from(ty: PropertyType) -> Self {
        Self::new(ty)
    }
}
