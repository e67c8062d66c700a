use ch_core::{CoreError, InstanceId};
use ch_path::PathError;
use thiserror::Error;

use crate::PropertyType;

/// Errors detected while a builder chain is being registered.
///
/// No definition is produced from a chain that raised one of these, so an
/// invalid composition never reaches instantiation.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("property `{name}` is declared more than once in the composition")]
    DuplicateProperty { name: String },

    #[error("default value of property `{name}` is {found}, expected {expected}")]
    PropertyDefault {
        name:     String,
        expected: PropertyType,
        found:    &'static str,
    },

    #[error("static data must be an object, got {found}")]
    StaticDataNotObject { found: &'static str },

    #[error("observer `{key}` watches `{path}`, which is not a declared data field or property")]
    UnknownObserverPath { key: String, path: String },

    #[error("invalid path: {0}")]
    Path(#[from] PathError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised by a live (or constructing) component instance.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("`{op}` is not allowed before construction completes")]
    NotLive { op: &'static str },

    #[error("`{op}` is only allowed inside init functions, before construction completes")]
    ConstructionComplete { op: &'static str },

    #[error("observer `{key}` has no matching `.observer` declaration in the builder chain")]
    UndeclaredObserver { key: String },

    #[error("`created` already fired for instance {id}")]
    CreatedFired { id: InstanceId },

    #[error("instance {id} has been destroyed")]
    Destroyed { id: InstanceId },

    #[error("no method named `{name}`")]
    UnknownMethod { name: String },

    #[error("no property named `{name}`")]
    UnknownProperty { name: String },

    #[error("property `{name}` expects {expected}, got {found}")]
    PropertyType {
        name:     String,
        expected: PropertyType,
        found:    &'static str,
    },

    #[error("no relation named `{name}`")]
    UnknownRelation { name: String },

    #[error("data update must be an object of path → value, got {found}")]
    InvalidUpdate { found: &'static str },

    #[error("invalid path: {0}")]
    Path(#[from] PathError),

    /// Failure reported by behavior-authored code (typically an init function).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ComposeResult<T> = Result<T, ComposeError>;

/// JSON kind name used in diagnostics.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
