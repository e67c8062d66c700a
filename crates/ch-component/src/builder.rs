//! Chainable builders for behaviors and components.
//!
//! # Usage
//!
//! ```rust
//! use ch_component::{PropertyType, Registry};
//! use ch_core::Lifetime;
//! use serde_json::json;
//!
//! let registry = Registry::new();
//! let counter = registry
//!     .behavior()
//!     .property("step", PropertyType::Number)
//!     .static_data(json!({ "count": 0 }))
//!     .register()
//!     .unwrap();
//!
//! let widget = registry
//!     .component()
//!     .behavior(&counter)
//!     .lifetime(Lifetime::Attached, |comp, _| {
//!         let next = comp.data()["count"].as_i64().unwrap_or(0) + 1;
//!         comp.set_data(json!({ "count": next }))?;
//!         Ok(())
//!     })
//!     .register()
//!     .unwrap();
//!
//! let mut instance = registry.instantiate(&widget).unwrap();
//! instance.attached().unwrap();
//! assert_eq!(instance.data()["count"], 1);
//! ```
//!
//! # Phases
//!
//! A builder is *building* until [`Builder::register`] consumes it; nothing
//! can be declared on a registered definition.  Errors raised mid-chain
//! (a malformed observer path, non-object static data) are held and returned
//! by `register`, together with the checks that need the whole composition
//! (duplicate properties, unresolvable observer paths).

use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;

use ch_core::{CallbackResult, Lifetime, PageLifetime};
use ch_path::{ObserverKey, PathResult};
use serde_json::Value;

use crate::declaration::Declaration;
use crate::definition::{Definition, DefinitionKind, Flattened};
use crate::{
    BuildError, BuildResult, ClassicDefinition, Component, ComponentOptions, ComposeResult,
    InitContext, InitExports, Method, PropertyDef, Registry, RelationDescriptor,
};

// ── Handles ───────────────────────────────────────────────────────────────────

/// A registered behavior, usable by other builders' `behavior()` calls.
#[derive(Clone)]
pub struct BehaviorHandle(pub(crate) Rc<Definition>);

/// A registered component, usable by the host to create instances.
#[derive(Clone)]
pub struct ComponentHandle(pub(crate) Rc<Definition>);

impl BehaviorHandle {
    pub fn definition(&self) -> &Definition {
        &self.0
    }
}

impl ComponentHandle {
    pub fn definition(&self) -> &Definition {
        &self.0
    }
}

// ── Kinds ─────────────────────────────────────────────────────────────────────

/// What a builder produces.  Sealed: only [`BehaviorKind`] and
/// [`ComponentKind`] exist.
pub trait BuilderKind: sealed::Sealed {
    type Handle;
    const KIND: DefinitionKind;

    #[doc(hidden)]
    fn wrap(definition: Rc<Definition>) -> Self::Handle;
}

mod sealed {
    pub trait Sealed {}
}

pub struct BehaviorKind;
pub struct ComponentKind;

impl sealed::Sealed for BehaviorKind {}
impl sealed::Sealed for ComponentKind {}

impl BuilderKind for BehaviorKind {
    type Handle = BehaviorHandle;
    const KIND: DefinitionKind = DefinitionKind::Behavior;

    fn wrap(definition: Rc<Definition>) -> BehaviorHandle {
        BehaviorHandle(definition)
    }
}

impl BuilderKind for ComponentKind {
    type Handle = ComponentHandle;
    const KIND: DefinitionKind = DefinitionKind::Component;

    fn wrap(definition: Rc<Definition>) -> ComponentHandle {
        ComponentHandle(definition)
    }
}

// ── Observer paths ────────────────────────────────────────────────────────────

/// Anything that names the paths of one observer: a single path string
/// (which may itself be `", "`-joined) or a list of path strings.
pub trait ObserverPaths {
    fn into_key(self) -> PathResult<ObserverKey>;
}

impl ObserverPaths for &str {
    fn into_key(self) -> PathResult<ObserverKey> {
        ObserverKey::parse(self)
    }
}

impl ObserverPaths for String {
    fn into_key(self) -> PathResult<ObserverKey> {
        ObserverKey::parse(&self)
    }
}

impl<const N: usize> ObserverPaths for [&str; N] {
    fn into_key(self) -> PathResult<ObserverKey> {
        ObserverKey::new(self)
    }
}

impl ObserverPaths for &[&str] {
    fn into_key(self) -> PathResult<ObserverKey> {
        ObserverKey::new(self)
    }
}

impl ObserverPaths for Vec<String> {
    fn into_key(self) -> PathResult<ObserverKey> {
        ObserverKey::new(self)
    }
}

impl ObserverPaths for ObserverKey {
    fn into_key(self) -> PathResult<ObserverKey> {
        Ok(self)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Accumulates declarations for one behavior or component.
///
/// Create through [`Registry::behavior`] or [`Registry::component`].
pub struct Builder<'r, K: BuilderKind> {
    registry:     &'r Registry,
    declarations: Vec<Declaration>,
    options:      ComponentOptions,
    error:        Option<BuildError>,
    _kind:        PhantomData<K>,
}

impl<'r, K: BuilderKind> Builder<'r, K> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            declarations: Vec::new(),
            options:      ComponentOptions::default(),
            error:        None,
            _kind:        PhantomData,
        }
    }

    fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Keep the first error; later declarations are still recorded but the
    /// chain can no longer register.
    fn fail(mut self, error: BuildError) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }

    /// Merge `fields` (a JSON object) into the static data.  Later fields
    /// overwrite earlier ones of the same name.
    pub fn static_data(self, fields: Value) -> Self {
        match fields {
            Value::Object(map) => self.declare(Declaration::StaticData(map)),
            other => {
                let found = crate::error::kind_of(&other);
                self.fail(BuildError::StaticDataNotObject { found })
            }
        }
    }

    /// Declare a property.  The name must be unique across the whole
    /// composition; a duplicate fails `register`.
    pub fn property(self, name: impl Into<String>, def: impl Into<PropertyDef>) -> Self {
        self.declare(Declaration::Property(name.into(), def.into()))
    }

    /// Merge a table of public methods; later names overwrite earlier ones.
    pub fn methods<I, N>(self, table: I) -> Self
    where
        I: IntoIterator<Item = (N, Method)>,
        N: Into<String>,
    {
        let table = table.into_iter().map(|(name, f)| (name.into(), f)).collect();
        self.declare(Declaration::Methods(table))
    }

    /// Declare a data observer on `paths` and add `f` to it.
    ///
    /// The key is normalised to its `", "`-joined form; init functions that
    /// want to add observers at construction time must use the same key.
    pub fn observer<P, F>(self, paths: P, f: F) -> Self
    where
        P: ObserverPaths,
        F: Fn(&mut Component, &[Value]) -> CallbackResult + 'static,
    {
        match paths.into_key() {
            Ok(key) => self.declare(Declaration::Observer(key, Rc::new(f))),
            Err(e) => self.fail(e.into()),
        }
    }

    pub fn lifetime<F>(self, name: Lifetime, f: F) -> Self
    where
        F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
    {
        self.declare(Declaration::Lifetime(name, Rc::new(f)))
    }

    pub fn page_lifetime<F>(self, name: PageLifetime, f: F) -> Self
    where
        F: Fn(&mut Component, &Value) -> CallbackResult + 'static,
    {
        self.declare(Declaration::PageLifetime(name, Rc::new(f)))
    }

    pub fn relation(self, name: impl Into<String>, descriptor: RelationDescriptor) -> Self {
        self.declare(Declaration::Relation(name.into(), descriptor))
    }

    /// Set the value exposed to selectors.  A later `export` replaces an
    /// earlier one.
    pub fn export<T, F>(self, f: F) -> Self
    where
        T: Any,
        F: Fn(&Component) -> T + 'static,
    {
        self.declare(Declaration::Export(Rc::new(move |comp: &Component| -> Box<dyn Any> {
            Box::new(f(comp))
        })))
    }

    /// Run `f` once per instance while it is constructing.  Tagged methods
    /// in the returned exports join the instance's method table.
    pub fn init<F>(self, f: F) -> Self
    where
        F: Fn(&mut InitContext<'_>) -> ComposeResult<InitExports> + 'static,
    {
        self.declare(Declaration::Init(Rc::new(f)))
    }

    pub fn external_classes<I, S>(self, list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(Declaration::ExternalClasses(list.into_iter().map(Into::into).collect()))
    }

    /// Compose a registered behavior at this point of the chain.
    pub fn behavior(self, other: &BehaviorHandle) -> Self {
        self.declare(Declaration::Include(other.clone()))
    }

    /// Apply a classic definition, category by category.
    pub fn definition(mut self, classic: ClassicDefinition) -> Self {
        let (declarations, options) = match classic.into_declarations() {
            Ok(parts) => parts,
            Err(e) => return self.fail(e),
        };
        self.declarations.extend(declarations);
        if let Some(options) = options {
            match K::KIND {
                DefinitionKind::Component => self.options = options,
                DefinitionKind::Behavior => {
                    tracing::warn!("component options in a behavior definition are ignored");
                }
            }
        }
        self
    }

    /// Freeze the chain into a definition and store it in the registry.
    pub fn register(self) -> BuildResult<K::Handle> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let id = self.registry.ids().next_behavior();
        let flat = Flattened::build(id, &self.declarations)?;
        flat.validate(self.registry.config())?;

        let definition = Rc::new(Definition {
            id,
            kind: K::KIND,
            declarations: self.declarations,
            flat,
            options: self.options,
        });
        tracing::debug!(
            id = id.get(),
            kind = ?K::KIND,
            members = definition.members().len(),
            inits = definition.init_count(),
            "definition registered"
        );
        self.registry.store(Rc::clone(&definition));
        Ok(K::wrap(definition))
    }
}

impl<'r> Builder<'r, ComponentKind> {
    /// Set component options.  Only the last call takes effect.
    pub fn options(mut self, options: ComponentOptions) -> Self {
        self.options = options;
        self
    }
}
