//! Per-instance composition state.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use ch_trait::TraitGroup;

use crate::definition::{Definition, LifetimeTable, ObserverTable, PageLifetimeTable};

/// Where an instance is in its life.
///
/// ```text
/// Uninitialized ──create──▶ Constructing ──inits done──▶ Live ──destroy──▶ Destroyed
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Uninitialized,
    Constructing,
    Live,
    Destroyed,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Constructing => "constructing",
            Phase::Live => "live",
            Phase::Destroyed => "destroyed",
        }
    }
}

/// Everything an instance owns about its own composition: the phase, the
/// resolved trait implementations, and its private copies of the handler
/// tables.
///
/// The tables start out sharing their callback sequences with the definition;
/// an init-time registration copies the affected list before appending, so
/// neither the definition nor sibling instances ever see it.
pub(crate) struct InstanceMeta {
    pub phase:          Phase,
    pub traits:         TraitGroup,
    pub lifetimes:      LifetimeTable,
    pub page_lifetimes: PageLifetimeTable,
    pub observers:      ObserverTable,
}

impl InstanceMeta {
    pub fn from_definition(definition: &Definition) -> Self {
        Self {
            phase:          Phase::Uninitialized,
            traits:         TraitGroup::new(),
            lifetimes:      definition.flat.lifetimes.clone(),
            page_lifetimes: definition.flat.page_lifetimes.clone(),
            observers:      definition.flat.observers.clone(),
        }
    }
}

// ── Extra fields ──────────────────────────────────────────────────────────────

/// Typed per-instance slots, one value per type.
#[derive(Default)]
pub(crate) struct ExtraFields {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl ExtraFields {
    pub fn insert<T: Any>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.map.get(&TypeId::of::<T>()).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.map.get_mut(&TypeId::of::<T>()).and_then(|v| v.downcast_mut::<T>())
    }

    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }
}
