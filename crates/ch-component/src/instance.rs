//! Live component instances.
//!
//! # Construction
//!
//! [`Registry::instantiate`](crate::Registry::instantiate) builds a
//! [`Component`] in one go:
//!
//! 1. Copy the definition's handler tables into the instance (sharing their
//!    callback sequences until something is appended).
//! 2. Enter `Constructing` and run every init function in flattened order,
//!    each with an [`InitContext`].  Tagged methods returned by an init
//!    function join the method table as soon as it returns.
//! 3. Enter `Live` and fire the `created` handlers.  Their faults do not
//!    abort construction; the outcome is kept in
//!    [`Component::created_report`].
//!
//! An init function that returns `Err` aborts construction; no instance is
//! produced.
//!
//! # Data updates
//!
//! [`Component::set_data`] takes a JSON object mapping path strings to new
//! values.  The batch is applied atomically (a failing path restores the
//! previous data), then every observer key is checked once against the
//! written paths:
//!
//! | Written path vs. watched path       | Fires?                          |
//! |-------------------------------------|---------------------------------|
//! | same path                           | yes                             |
//! | nested under a `.**` watched path   | yes                             |
//! | ancestor of the watched path        | only if the watched value changed |
//! | unrelated                           | no                              |

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use ch_core::{
    CallbackList, CallbackResult, InstanceId, InvokeReport, Lifetime, PageLifetime, guarded,
};
use ch_path::{DataPath, Overlap, tree};
use ch_trait::TraitBehavior;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::context::InitContext;
use crate::definition::Definition;
use crate::error::kind_of;
use crate::meta::{ExtraFields, InstanceMeta, Phase};
use crate::{ComposeError, ComposeResult, LifetimeFn, Method, ObserverPaths, RelationEvent};

pub struct Component {
    id:           InstanceId,
    definition:   Rc<Definition>,
    data:         Value,
    methods:      IndexMap<String, Method>,
    meta:         InstanceMeta,
    extras:       ExtraFields,
    attached:     bool,
    catch_panics: bool,
    created:      InvokeReport,
}

impl Component {
    pub(crate) fn create(
        id:           InstanceId,
        definition:   Rc<Definition>,
        catch_panics: bool,
    ) -> ComposeResult<Self> {
        let data = definition.initial_data();
        let methods = definition.flat.methods.clone();
        let meta = InstanceMeta::from_definition(&definition);
        let mut comp = Self {
            id,
            definition,
            data,
            methods,
            meta,
            extras: ExtraFields::default(),
            attached: false,
            catch_panics,
            created: InvokeReport::default(),
        };

        comp.meta.phase = Phase::Constructing;
        tracing::debug!(
            instance = id.get(),
            definition = comp.definition.id().get(),
            inits = comp.definition.init_count(),
            "instance constructing"
        );
        let inits = comp.definition.flat.init_fns.clone();
        for init in &inits {
            let exports = init(&mut InitContext::new(&mut comp))?;
            for (name, method) in exports.into_methods() {
                comp.methods.insert(name, method.into_func());
            }
        }

        comp.meta.phase = Phase::Live;
        tracing::debug!(instance = id.get(), methods = comp.methods.len(), "instance live");
        comp.created = comp.fire_lifetime(Lifetime::Created, &Value::Null)?;
        if !comp.created.is_ok() {
            tracing::warn!(
                instance = id.get(),
                faults = comp.created.faults.len(),
                "created handlers faulted"
            );
        }
        Ok(comp)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn phase(&self) -> Phase {
        self.meta.phase
    }

    pub fn is_live(&self) -> bool {
        self.meta.phase == Phase::Live
    }

    /// `true` between an `attached` and the following `detached`.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Outcome of the `created` handlers run during instantiation.
    pub fn created_report(&self) -> &InvokeReport {
        &self.created
    }

    /// Handlers this instance will run for `lifetime`.
    pub fn lifetime_handler_count(&self, lifetime: Lifetime) -> usize {
        self.meta.lifetimes.get(&lifetime).map_or(0, CallbackList::len)
    }

    /// Handlers on observer `key`, or `None` if the key is undeclared.
    pub fn observer_handler_count(&self, key: &str) -> Option<usize> {
        self.meta.observers.get(key).map(CallbackList::len)
    }

    // ── Phase guards ──────────────────────────────────────────────────────

    fn ensure_live(&self, op: &'static str) -> ComposeResult<()> {
        match self.meta.phase {
            Phase::Live => Ok(()),
            Phase::Destroyed => {
                tracing::warn!(instance = self.id.get(), op, "dispatch to a destroyed instance");
                Err(ComposeError::Destroyed { id: self.id })
            }
            Phase::Uninitialized | Phase::Constructing => Err(ComposeError::NotLive { op }),
        }
    }

    fn ensure_constructing(&self, op: &'static str) -> ComposeResult<()> {
        match self.meta.phase {
            Phase::Constructing => Ok(()),
            Phase::Destroyed => Err(ComposeError::Destroyed { id: self.id }),
            Phase::Uninitialized | Phase::Live => Err(ComposeError::ConstructionComplete { op }),
        }
    }

    // ── Construction-time registration ────────────────────────────────────

    /// Store an implementation of `descriptor` on this instance.  A later
    /// call for the same descriptor replaces the earlier one.
    pub fn implement<In, Out: 'static>(
        &mut self,
        descriptor: &TraitBehavior<In, Out>,
        raw:        In,
    ) -> ComposeResult<()> {
        self.ensure_constructing("implement")?;
        self.meta.traits.implement(descriptor, raw);
        Ok(())
    }

    /// Add `f` to observer `paths`.  The normalised key must already be
    /// declared by the builder chain.
    pub fn observer<P, F>(&mut self, paths: P, f: F) -> ComposeResult<()>
    where
        P: ObserverPaths,
        F: Fn(&mut Component, &[Value]) -> CallbackResult + 'static,
    {
        self.ensure_constructing("observer")?;
        let key = paths.into_key()?;
        let list = self
            .meta
            .observers
            .get_mut(key.as_str())
            .ok_or_else(|| ComposeError::UndeclaredObserver { key: key.to_string() })?;
        list.add(Rc::new(f));
        Ok(())
    }

    pub fn lifetime<F>(&mut self, name: Lifetime, f: F) -> ComposeResult<()>
    where
        F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
    {
        self.ensure_constructing("lifetime")?;
        self.meta.lifetimes.entry(name).or_default().add(Rc::new(f));
        Ok(())
    }

    pub fn page_lifetime<F>(&mut self, name: PageLifetime, f: F) -> ComposeResult<()>
    where
        F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
    {
        self.ensure_constructing("page_lifetime")?;
        self.meta.page_lifetimes.entry(name).or_default().add(Rc::new(f));
        Ok(())
    }

    // ── Traits ────────────────────────────────────────────────────────────

    /// The implementation of `descriptor`, or `None` if no composed behavior
    /// implemented it.
    pub fn trait_behavior<In, Out: Clone + 'static>(
        &self,
        descriptor: &TraitBehavior<In, Out>,
    ) -> Option<Out> {
        self.meta.traits.get(descriptor)
    }

    // ── Data ──────────────────────────────────────────────────────────────

    /// Apply a batch of path → value assignments and fire the observers they
    /// touch.  Fails with `NotLive` during construction.
    pub fn set_data(&mut self, update: Value) -> ComposeResult<InvokeReport> {
        self.ensure_live("set_data")?;
        let entries = match update {
            Value::Object(entries) => entries,
            other => return Err(ComposeError::InvalidUpdate { found: kind_of(&other) }),
        };
        let mut changes = Vec::with_capacity(entries.len());
        for (text, value) in entries {
            changes.push((DataPath::parse(&text)?, value));
        }

        let before = self.data.clone();
        let mut written = Vec::with_capacity(changes.len());
        for (path, value) in changes {
            if let Err(e) = tree::set(&mut self.data, &path, value) {
                self.data = before;
                return Err(e.into());
            }
            written.push(path);
        }
        tracing::trace!(instance = self.id.get(), paths = written.len(), "data updated");
        Ok(self.notify(&before, &written))
    }

    /// [`set_data`](Self::set_data), then `callback` once observers have run.
    /// A failing callback is recorded in the report like any other fault.
    pub fn set_data_then<F>(&mut self, update: Value, callback: F) -> ComposeResult<InvokeReport>
    where
        F: FnOnce(&mut Component) -> CallbackResult,
    {
        let mut report = self.set_data(update)?;
        let catch = self.catch_panics;
        report.invoked += 1;
        if let Err(fault) = guarded("set_data callback", 0, catch, || callback(self)) {
            report.faults.push(fault);
        }
        Ok(report)
    }

    /// Host-side property write.  The value must match the declared type.
    pub fn set_property(&mut self, name: &str, value: Value) -> ComposeResult<InvokeReport> {
        let def = self
            .definition
            .property(name)
            .ok_or_else(|| ComposeError::UnknownProperty { name: name.to_owned() })?;
        if !def.ty.accepts(&value) {
            return Err(ComposeError::PropertyType {
                name:     name.to_owned(),
                expected: def.ty,
                found:    kind_of(&value),
            });
        }
        let mut update = Map::new();
        update.insert(name.to_owned(), value);
        self.set_data(Value::Object(update))
    }

    fn touches(&self, watched: &DataPath, before: &Value, written: &[DataPath]) -> bool {
        written.iter().any(|changed| match watched.overlap(changed) {
            Overlap::Ancestor => tree::get(before, watched) != tree::get(&self.data, watched),
            overlap => overlap.is_direct(),
        })
    }

    fn notify(&mut self, before: &Value, written: &[DataPath]) -> InvokeReport {
        let due: Vec<_> = self
            .meta
            .observers
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .filter(|(key, _)| key.paths().iter().any(|p| self.touches(p, before, written)))
            .map(|(key, list)| (key.clone(), list.clone()))
            .collect();

        let catch = self.catch_panics;
        let mut report = InvokeReport::default();
        for (key, list) in due {
            let args: Vec<Value> =
                key.paths().iter().map(|p| tree::get_or_null(&self.data, p)).collect();
            tracing::trace!(instance = self.id.get(), observer = %key, "observer fired");
            report.merge(list.invoke_with(key.as_str(), catch, |f| f(self, &args)));
        }
        report
    }

    // ── Lifetimes ─────────────────────────────────────────────────────────

    /// Run every handler registered for `lifetime`.  `created` only fires
    /// during instantiation and is rejected here.
    pub fn trigger_lifetime(
        &mut self,
        lifetime: Lifetime,
        arg:      &Value,
    ) -> ComposeResult<InvokeReport> {
        if lifetime == Lifetime::Created {
            return Err(ComposeError::CreatedFired { id: self.id });
        }
        self.fire_lifetime(lifetime, arg)
    }

    fn fire_lifetime(&mut self, lifetime: Lifetime, arg: &Value) -> ComposeResult<InvokeReport> {
        self.ensure_live(lifetime.name())?;
        match lifetime {
            Lifetime::Attached => self.attached = true,
            Lifetime::Detached => self.attached = false,
            _ => {}
        }
        let list = self.meta.lifetimes.get(&lifetime).cloned().unwrap_or_default();
        Ok(self.dispatch(lifetime.name(), &list, arg))
    }

    pub fn trigger_page_lifetime(
        &mut self,
        lifetime: PageLifetime,
        arg:      &Value,
    ) -> ComposeResult<InvokeReport> {
        self.ensure_live(lifetime.name())?;
        let list = self.meta.page_lifetimes.get(&lifetime).cloned().unwrap_or_default();
        Ok(self.dispatch(lifetime.name(), &list, arg))
    }

    fn dispatch(
        &mut self,
        label: &str,
        list:  &CallbackList<LifetimeFn>,
        arg:   &Value,
    ) -> InvokeReport {
        tracing::trace!(instance = self.id.get(), event = label, handlers = list.len(), "dispatch");
        let catch = self.catch_panics;
        list.invoke_with(label, catch, |f| f(self, arg))
    }

    pub fn attached(&mut self) -> ComposeResult<InvokeReport> {
        self.trigger_lifetime(Lifetime::Attached, &Value::Null)
    }

    pub fn moved(&mut self) -> ComposeResult<InvokeReport> {
        self.trigger_lifetime(Lifetime::Moved, &Value::Null)
    }

    pub fn ready(&mut self) -> ComposeResult<InvokeReport> {
        self.trigger_lifetime(Lifetime::Ready, &Value::Null)
    }

    pub fn detached(&mut self) -> ComposeResult<InvokeReport> {
        self.trigger_lifetime(Lifetime::Detached, &Value::Null)
    }

    pub fn show(&mut self) -> ComposeResult<InvokeReport> {
        self.trigger_page_lifetime(PageLifetime::Show, &Value::Null)
    }

    pub fn hide(&mut self) -> ComposeResult<InvokeReport> {
        self.trigger_page_lifetime(PageLifetime::Hide, &Value::Null)
    }

    pub fn resize(&mut self, size: Value) -> ComposeResult<InvokeReport> {
        self.trigger_page_lifetime(PageLifetime::Resize, &size)
    }

    /// Tear the instance down.  `detached` handlers run first if the
    /// instance is still attached; afterwards every dispatch fails with
    /// `Destroyed`.
    pub fn destroy(&mut self) -> ComposeResult<InvokeReport> {
        self.ensure_live("destroy")?;
        let report = if self.attached { self.detached()? } else { InvokeReport::default() };
        self.meta.phase = Phase::Destroyed;
        tracing::debug!(instance = self.id.get(), "instance destroyed");
        Ok(report)
    }

    // ── Methods, relations, export ────────────────────────────────────────

    /// Invoke public method `name` with `detail`, isolating its failure.
    pub fn call_method(&mut self, name: &str, detail: &Value) -> ComposeResult<InvokeReport> {
        self.ensure_live("call_method")?;
        let method = self
            .methods
            .get(name)
            .cloned()
            .ok_or_else(|| ComposeError::UnknownMethod { name: name.to_owned() })?;
        let catch = self.catch_panics;
        let mut report = InvokeReport { invoked: 1, faults: Vec::new() };
        if let Err(fault) = guarded(name, 0, catch, || method(self, detail)) {
            report.faults.push(fault);
        }
        Ok(report)
    }

    /// Forward a host relation event to relation `name`'s handler.
    pub fn relation_event(
        &mut self,
        name:  &str,
        event: RelationEvent,
        peer:  InstanceId,
    ) -> ComposeResult<InvokeReport> {
        self.ensure_live(event.name())?;
        let descriptor = self
            .definition
            .relation(name)
            .ok_or_else(|| ComposeError::UnknownRelation { name: name.to_owned() })?;
        let Some(handler) = descriptor.handler(event).cloned() else {
            return Ok(InvokeReport::default());
        };
        tracing::trace!(
            instance = self.id.get(),
            relation = name,
            event = event.name(),
            "relation event"
        );
        let catch = self.catch_panics;
        let mut report = InvokeReport { invoked: 1, faults: Vec::new() };
        if let Err(fault) = guarded(name, 0, catch, || handler(self, peer)) {
            report.faults.push(fault);
        }
        Ok(report)
    }

    /// What a selector sees: the export factory's value, or `None` if no
    /// behavior declared one or the instance is destroyed.
    pub fn select_export(&self) -> Option<Box<dyn Any>> {
        if self.meta.phase == Phase::Destroyed {
            tracing::warn!(instance = self.id.get(), "export selected on a destroyed instance");
            return None;
        }
        let factory = self.definition.flat.export.as_ref()?;
        Some(factory(self))
    }

    /// [`select_export`](Self::select_export) downcast to `T`.
    pub fn select_export_as<T: Any>(&self) -> Option<T> {
        self.select_export()?.downcast::<T>().ok().map(|value| *value)
    }

    // ── Extra fields ──────────────────────────────────────────────────────

    /// Attach a typed value to this instance, returning the previous value
    /// of the same type.
    pub fn insert_extra<T: Any>(&mut self, value: T) -> Option<T> {
        self.extras.insert(value)
    }

    pub fn extra<T: Any>(&self) -> Option<&T> {
        self.extras.get()
    }

    pub fn extra_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.extras.get_mut()
    }

    pub fn remove_extra<T: Any>(&mut self) -> Option<T> {
        self.extras.remove()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("definition", &self.definition.id())
            .field("phase", &self.meta.phase)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
