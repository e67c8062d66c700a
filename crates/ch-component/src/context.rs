//! The construction-scoped context handed to init functions.

use ch_core::{
    CallbackResult, InstanceId, InvokeReport, Lifetime, MethodTag, PageLifetime, TaggedMethod,
};
use ch_trait::TraitBehavior;
use indexmap::IndexMap;
use serde_json::Value;

use crate::{Component, ComposeResult, MethodFn, ObserverPaths, tagged};

/// Valid only while its instance is constructing.
///
/// Everything registered through the context lands in the instance's own
/// tables.  `set_data` exists so init code can share helpers with live code,
/// but it always fails here: data is frozen until construction completes.
pub struct InitContext<'c> {
    component: &'c mut Component,
}

impl<'c> InitContext<'c> {
    pub(crate) fn new(component: &'c mut Component) -> Self {
        Self { component }
    }

    pub fn id(&self) -> InstanceId {
        self.component.id()
    }

    /// The instance under construction.
    pub fn component(&self) -> &Component {
        &*self.component
    }

    pub fn component_mut(&mut self) -> &mut Component {
        &mut *self.component
    }

    /// Current data snapshot.
    pub fn data(&self) -> &Value {
        self.component.data()
    }

    /// Always `Err(ComposeError::NotLive)` during construction.
    pub fn set_data(&mut self, update: Value) -> ComposeResult<InvokeReport> {
        self.component.set_data(update)
    }

    pub fn implement<In, Out: 'static>(
        &mut self,
        descriptor: &TraitBehavior<In, Out>,
        raw:        In,
    ) -> ComposeResult<()> {
        self.component.implement(descriptor, raw)
    }

    /// Add `f` to an observer key declared by the builder chain.
    pub fn observer<P, F>(&mut self, paths: P, f: F) -> ComposeResult<()>
    where
        P: ObserverPaths,
        F: Fn(&mut Component, &[Value]) -> CallbackResult + 'static,
    {
        self.component.observer(paths, f)
    }

    pub fn lifetime<F>(&mut self, name: Lifetime, f: F) -> ComposeResult<()>
    where
        F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
    {
        self.component.lifetime(name, f)
    }

    pub fn page_lifetime<F>(&mut self, name: PageLifetime, f: F) -> ComposeResult<()>
    where
        F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
    {
        self.component.page_lifetime(name, f)
    }

    /// Tag `f` as a public method for the returned exports.
    pub fn method<F>(&self, f: F) -> TaggedMethod<MethodFn>
    where
        F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
    {
        tagged(MethodTag::Method, f)
    }

    /// Tag `f` as an event listener for the returned exports.
    pub fn listener<F>(&self, f: F) -> TaggedMethod<MethodFn>
    where
        F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
    {
        tagged(MethodTag::Listener, f)
    }
}

// ── Exports ───────────────────────────────────────────────────────────────────

/// One named value returned from an init function.
pub enum Exported {
    Method(TaggedMethod<MethodFn>),
    Value(Value),
}

impl From<TaggedMethod<MethodFn>> for Exported {
    fn from(method: TaggedMethod<MethodFn>) -> Self {
        Exported::Method(method)
    }
}

impl From<Value> for Exported {
    fn from(value: Value) -> Self {
        Exported::Value(value)
    }
}

/// What an init function hands back.  Only tagged methods join the
/// instance's method table; untagged callables and plain values are dropped.
#[derive(Default)]
pub struct InitExports {
    entries: IndexMap<String, Exported>,
}

impl InitExports {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Exported>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The tagged methods, in insertion order.
    pub(crate) fn into_methods(self) -> impl Iterator<Item = (String, TaggedMethod<MethodFn>)> {
        self.entries.into_iter().filter_map(|(name, value)| match value {
            Exported::Method(method) if method.is_tagged() => Some((name, method)),
            _ => None,
        })
    }
}
