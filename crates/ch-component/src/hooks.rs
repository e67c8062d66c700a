//! Callback signatures shared by builders, definitions, and instances.
//!
//! Every callback receives the instance it runs on as `&mut Component`.

use std::any::Any;
use std::rc::Rc;

use ch_core::{CallbackResult, InstanceId, MethodTag, TaggedMethod};
use serde_json::Value;

use crate::{Component, ComposeResult, InitContext, InitExports};

/// Lifetime and page-lifetime handlers.  The argument is `Value::Null`
/// except for `resize`, which receives the new size.
pub type LifetimeFn = dyn Fn(&mut Component, &Value) -> CallbackResult;

/// Data observers.  Receives the current value of each watched path, in
/// the order the paths appear in the observer key.
pub type ObserverFn = dyn Fn(&mut Component, &[Value]) -> CallbackResult;

/// Public methods and event handlers.  The argument is the event detail.
pub type MethodFn = dyn Fn(&mut Component, &Value) -> CallbackResult;

/// Relation handlers; receives the partner instance.
pub type RelationFn = dyn Fn(&mut Component, InstanceId) -> CallbackResult;

/// Selector export factory.
pub type ExportFn = dyn Fn(&Component) -> Box<dyn Any>;

/// Init functions, run once per instance while it is constructing.
pub type InitFn = dyn Fn(&mut InitContext<'_>) -> ComposeResult<InitExports>;

pub type Method = Rc<MethodFn>;

/// Wrap a closure as a [`Method`] for use in a `methods` table.
pub fn method<F>(f: F) -> Method
where
    F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
{
    Rc::new(f)
}

/// A method carrying the declared-method tag.
pub fn tagged<F>(tag: MethodTag, f: F) -> TaggedMethod<MethodFn>
where
    F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
{
    TaggedMethod::tag(method(f), tag)
}

/// Wrap a closure as an observer for a classic definition's `observers`.
pub fn observer_fn<F>(f: F) -> Rc<ObserverFn>
where
    F: Fn(&mut Component, &[Value]) -> CallbackResult + 'static,
{
    Rc::new(f)
}

/// Wrap a closure as a classic definition's `export` factory.
pub fn export_fn<T, F>(f: F) -> Rc<ExportFn>
where
    T: Any,
    F: Fn(&Component) -> T + 'static,
{
    Rc::new(move |comp: &Component| -> Box<dyn Any> { Box::new(f(comp)) })
}
