//! Frozen definitions and the flattening pass that produces them.
//!
//! # Flattening
//!
//! `register()` walks the chain's declarations depth-first.  An `Include`
//! of a behavior that was already visited (by [`BehaviorId`]) is skipped, so
//! a behavior reached through two paths contributes exactly once, at its
//! first occurrence.  Each declaration is then merged with its category's
//! rule:
//!
//! | Category            | Merge rule                                     |
//! |---------------------|------------------------------------------------|
//! | static data         | per-field overwrite (last write wins)          |
//! | properties          | must be unique across the composition          |
//! | methods, relations  | per-name overwrite                             |
//! | lifetimes, observers| appended to the named callback list            |
//! | init functions      | appended                                       |
//! | export              | replaced                                       |
//! | external classes    | appended                                       |

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use ch_core::{BehaviorId, CallbackList, ComposeConfig, Lifetime, PageLifetime};
use ch_path::{ObserverKey, Shape};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::declaration::Declaration;
use crate::{
    BuildError, BuildResult, ComponentOptions, ExportFn, InitFn, LifetimeFn, Method, ObserverFn,
    PropertyDef, RelationDescriptor,
};

pub(crate) type LifetimeTable = HashMap<Lifetime, CallbackList<LifetimeFn>>;
pub(crate) type PageLifetimeTable = HashMap<PageLifetime, CallbackList<LifetimeFn>>;
pub(crate) type ObserverTable = IndexMap<ObserverKey, CallbackList<ObserverFn>>;

/// Whether a definition can be instantiated or only composed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DefinitionKind {
    Behavior,
    Component,
}

// ── Flattened ─────────────────────────────────────────────────────────────────

/// Every declaration of a composition, merged into per-category tables.
#[derive(Default)]
pub(crate) struct Flattened {
    pub static_data:      Map<String, Value>,
    pub properties:       IndexMap<String, PropertyDef>,
    pub methods:          IndexMap<String, Method>,
    pub lifetimes:        LifetimeTable,
    pub page_lifetimes:   PageLifetimeTable,
    pub observers:        ObserverTable,
    pub relations:        IndexMap<String, RelationDescriptor>,
    pub export:           Option<Rc<ExportFn>>,
    pub init_fns:         Vec<Rc<InitFn>>,
    pub external_classes: Vec<String>,
    /// Composed behaviors in the order they were flattened.
    pub members:          Vec<BehaviorId>,
}

impl Flattened {
    /// Flatten `declarations` (belonging to definition `owner`).
    pub fn build(owner: BehaviorId, declarations: &[Declaration]) -> BuildResult<Self> {
        let mut flat = Flattened::default();
        // Every chain can observe `**`, so init-time registrations always
        // have at least one declared target.
        flat.observers.insert(ObserverKey::everything(), CallbackList::new());
        let mut visited = HashSet::from([owner]);
        flat.merge(declarations, &mut visited)?;
        Ok(flat)
    }

    fn merge(
        &mut self,
        declarations: &[Declaration],
        visited:      &mut HashSet<BehaviorId>,
    ) -> BuildResult<()> {
        for declaration in declarations {
            match declaration {
                Declaration::StaticData(fields) => {
                    for (name, value) in fields {
                        self.static_data.insert(name.clone(), value.clone());
                    }
                }
                Declaration::Property(name, def) => {
                    if self.properties.contains_key(name) {
                        return Err(BuildError::DuplicateProperty { name: name.clone() });
                    }
                    self.properties.insert(name.clone(), def.clone());
                }
                Declaration::Methods(table) => {
                    for (name, method) in table {
                        self.methods.insert(name.clone(), Rc::clone(method));
                    }
                }
                Declaration::Observer(key, f) => {
                    self.observers.entry(key.clone()).or_default().add(Rc::clone(f));
                }
                Declaration::Lifetime(name, f) => {
                    self.lifetimes.entry(*name).or_default().add(Rc::clone(f));
                }
                Declaration::PageLifetime(name, f) => {
                    self.page_lifetimes.entry(*name).or_default().add(Rc::clone(f));
                }
                Declaration::Relation(name, descriptor) => {
                    self.relations.insert(name.clone(), descriptor.clone());
                }
                Declaration::Export(f) => {
                    if self.export.replace(Rc::clone(f)).is_some() {
                        tracing::debug!("export factory replaced by a later declaration");
                    }
                }
                Declaration::Init(f) => self.init_fns.push(Rc::clone(f)),
                Declaration::ExternalClasses(list) => {
                    self.external_classes.extend(list.iter().cloned());
                }
                Declaration::Include(behavior) => {
                    let def = behavior.definition();
                    if visited.insert(def.id()) {
                        self.merge(&def.declarations, visited)?;
                        self.members.push(def.id());
                    }
                }
            }
        }
        Ok(())
    }

    /// Check property defaults against their types and observer paths
    /// against the declared data shape.
    pub fn validate(&self, config: &ComposeConfig) -> BuildResult<()> {
        for (name, def) in &self.properties {
            if let Some(value) = &def.value {
                if !def.ty.accepts(value) {
                    return Err(BuildError::PropertyDefault {
                        name:     name.clone(),
                        expected: def.ty,
                        found:    crate::error::kind_of(value),
                    });
                }
            }
        }

        if !config.validate_observer_paths {
            return Ok(());
        }
        let shape = self.data_shape(config.max_path_depth);
        for key in self.observers.keys() {
            for path in key.paths() {
                if path.is_everything() {
                    continue;
                }
                if shape.resolve(path, config.max_path_depth).is_none() {
                    return Err(BuildError::UnknownObserverPath {
                        key:  key.to_string(),
                        path: path.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Shape of the instance data: static fields overlaid with properties.
    fn data_shape(&self, max_depth: usize) -> Shape {
        let mut fields = IndexMap::new();
        for (name, value) in &self.static_data {
            fields.insert(name.clone(), Shape::infer(value, max_depth));
        }
        for (name, def) in &self.properties {
            fields.insert(name.clone(), def.shape(max_depth));
        }
        Shape::Object(fields)
    }

    /// Initial instance data: static fields, then property initial values.
    pub fn initial_data(&self) -> Value {
        let mut data = self.static_data.clone();
        for (name, def) in &self.properties {
            data.insert(name.clone(), def.initial_value());
        }
        Value::Object(data)
    }
}

// ── Definition ────────────────────────────────────────────────────────────────

/// A registered, immutable behavior or component definition.
///
/// Handed out behind [`BehaviorHandle`](crate::BehaviorHandle) /
/// [`ComponentHandle`](crate::ComponentHandle); every instance of a component
/// reads its tables and never writes them.
pub struct Definition {
    pub(crate) id:           BehaviorId,
    pub(crate) kind:         DefinitionKind,
    pub(crate) declarations: Vec<Declaration>,
    pub(crate) flat:         Flattened,
    pub(crate) options:      ComponentOptions,
}

impl Definition {
    pub fn id(&self) -> BehaviorId {
        self.id
    }

    pub fn kind(&self) -> DefinitionKind {
        self.kind
    }

    /// Field values every new instance starts from.
    pub fn initial_data(&self) -> Value {
        self.flat.initial_data()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.flat.properties.get(name)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.flat.properties.keys().map(String::as_str)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.flat.methods.keys().map(String::as_str)
    }

    /// `true` if `key` (in canonical `", "`-joined form) has been declared.
    pub fn declares_observer(&self, key: &str) -> bool {
        self.flat.observers.contains_key(key)
    }

    pub fn lifetime_handler_count(&self, lifetime: Lifetime) -> usize {
        self.flat.lifetimes.get(&lifetime).map_or(0, CallbackList::len)
    }

    pub fn init_count(&self) -> usize {
        self.flat.init_fns.len()
    }

    /// `true` if the host should call the export factory on selection.
    pub fn has_export(&self) -> bool {
        self.flat.export.is_some()
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.flat.relations.get(name)
    }

    pub fn external_classes(&self) -> &[String] {
        &self.flat.external_classes
    }

    pub fn options(&self) -> &ComponentOptions {
        &self.options
    }

    /// Behaviors composed into this definition, in flattening order.
    pub fn members(&self) -> &[BehaviorId] {
        &self.flat.members
    }
}
