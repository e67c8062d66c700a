//! Per-instance registry of trait implementations.
//!
//! # Design
//!
//! Implementations of different descriptors have different types, so each
//! one is stored type-erased as `Box<dyn Any>` keyed by [`TraitId`] and
//! downcast on lookup.  A descriptor's `Out` type is fixed, so a lookup with
//! the same descriptor always downcasts successfully.

use std::any::Any;

use ch_core::TraitId;

use crate::TraitBehavior;

#[cfg(feature = "fx-hash")]
type ImplMap = rustc_hash::FxHashMap<TraitId, Box<dyn Any>>;
#[cfg(not(feature = "fx-hash"))]
type ImplMap = std::collections::HashMap<TraitId, Box<dyn Any>>;

/// Resolved descriptor → implementation mapping owned by one instance.
#[derive(Default)]
pub struct TraitGroup {
    impls: ImplMap,
}

impl TraitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `raw` (after the descriptor's transform) for `descriptor`.
    ///
    /// A second call for the same descriptor replaces the first; this is
    /// how a later-composed behavior supersedes a default implementation.
    pub fn implement<In, Out: 'static>(&mut self, descriptor: &TraitBehavior<In, Out>, raw: In) {
        let stored = descriptor.apply(raw);
        if self.impls.insert(descriptor.id(), Box::new(stored)).is_some() {
            tracing::debug!(trait_id = descriptor.id().get(), "trait implementation replaced");
        }
    }

    /// The implementation for `descriptor`, or `None` if nothing implements
    /// it.  Never fails otherwise.
    pub fn get<In, Out: Clone + 'static>(&self, descriptor: &TraitBehavior<In, Out>) -> Option<Out> {
        self.impls
            .get(&descriptor.id())
            .and_then(|stored| stored.downcast_ref::<Out>())
            .cloned()
    }

    pub fn contains<In, Out>(&self, descriptor: &TraitBehavior<In, Out>) -> bool {
        self.impls.contains_key(&descriptor.id())
    }

    /// Number of implemented descriptors.
    pub fn len(&self) -> usize {
        self.impls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impls.is_empty()
    }
}
