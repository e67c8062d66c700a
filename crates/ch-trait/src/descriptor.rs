//! Trait descriptors.

use std::fmt;
use std::rc::Rc;

use ch_core::TraitId;

/// An identity token for an abstract capability.
///
/// `In` is what implementors hand to `implement`; `Out` is what consumers get
/// back.  A descriptor built with [`with_transform`](Self::with_transform)
/// converts one into the other once, at implementation time.  Descriptors are
/// cheap to clone and compare by [`TraitId`] only.
pub struct TraitBehavior<In, Out = In> {
    id:        TraitId,
    transform: Rc<dyn Fn(In) -> Out>,
}

impl<T: 'static> TraitBehavior<T, T> {
    /// A descriptor whose implementations are stored as given.
    ///
    /// Ids come from a registry's `IdSource`; use `Registry::trait_behavior`.
    pub fn new(id: TraitId) -> Self {
        Self { id, transform: Rc::new(|raw: T| raw) }
    }
}

impl<In, Out> TraitBehavior<In, Out> {
    /// A descriptor that stores `transform(raw)` for every implementation.
    pub fn with_transform(id: TraitId, transform: impl Fn(In) -> Out + 'static) -> Self {
        Self { id, transform: Rc::new(transform) }
    }

    pub fn id(&self) -> TraitId {
        self.id
    }

    pub(crate) fn apply(&self, raw: In) -> Out {
        (self.transform)(raw)
    }
}

impl<In, Out> Clone for TraitBehavior<In, Out> {
    fn clone(&self) -> Self {
        Self { id: self.id, transform: Rc::clone(&self.transform) }
    }
}

impl<In, Out> PartialEq for TraitBehavior<In, Out> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<In, Out> Eq for TraitBehavior<In, Out> {}

impl<In, Out> fmt::Debug for TraitBehavior<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TraitBehavior").field(&self.id).finish()
    }
}
