//! The factory every builder, descriptor, and instance comes from.
//!
//! A [`Registry`] owns the [`ComposeConfig`] and the [`IdSource`]; nothing in
//! this crate keeps process-wide state.  Hosts normally create one registry
//! and share it by reference.

use std::cell::RefCell;
use std::rc::Rc;

use ch_core::{BehaviorId, ComposeConfig, CoreResult, IdSource};
use ch_trait::TraitBehavior;
use indexmap::IndexMap;

use crate::builder::{BehaviorKind, ComponentKind};
use crate::definition::Definition;
use crate::{Builder, Component, ComponentHandle, ComposeResult};

pub struct Registry {
    config:      ComposeConfig,
    ids:         IdSource,
    definitions: RefCell<IndexMap<BehaviorId, Rc<Definition>>>,
}

impl Registry {
    /// A registry with the default configuration.
    pub fn new() -> Self {
        Self {
            config:      ComposeConfig::default(),
            ids:         IdSource::new(),
            definitions: RefCell::new(IndexMap::new()),
        }
    }

    /// A registry with `config`, after validating it.
    pub fn with_config(config: ComposeConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::new() })
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    pub(crate) fn ids(&self) -> &IdSource {
        &self.ids
    }

    pub(crate) fn store(&self, definition: Rc<Definition>) {
        self.definitions.borrow_mut().insert(definition.id(), definition);
    }

    // ── Builders ──────────────────────────────────────────────────────────

    /// Start a behavior chain.
    pub fn behavior(&self) -> Builder<'_, BehaviorKind> {
        Builder::new(self)
    }

    /// Start a component chain.
    pub fn component(&self) -> Builder<'_, ComponentKind> {
        Builder::new(self)
    }

    // ── Trait descriptors ─────────────────────────────────────────────────

    /// A fresh capability descriptor whose implementations are stored as
    /// given.
    pub fn trait_behavior<T: 'static>(&self) -> TraitBehavior<T> {
        TraitBehavior::new(self.ids.next_trait())
    }

    /// A fresh capability descriptor that converts every implementation
    /// with `transform` before storing it.
    pub fn trait_behavior_with<In, Out>(
        &self,
        transform: impl Fn(In) -> Out + 'static,
    ) -> TraitBehavior<In, Out> {
        TraitBehavior::with_transform(self.ids.next_trait(), transform)
    }

    // ── Instances ─────────────────────────────────────────────────────────

    /// Create an instance of `component`: run its init functions, then its
    /// `created` handlers.
    pub fn instantiate(&self, component: &ComponentHandle) -> ComposeResult<Component> {
        Component::create(
            self.ids.next_instance(),
            Rc::clone(&component.0),
            self.config.catch_panics,
        )
    }

    /// A registered definition by id.
    pub fn lookup(&self, id: BehaviorId) -> Option<Rc<Definition>> {
        self.definitions.borrow().get(&id).cloned()
    }

    /// Number of registered definitions (behaviors and components).
    pub fn len(&self) -> usize {
        self.definitions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.borrow().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
