//! Strongly typed identity tokens.
//!
//! All ids are `Copy + Ord + Hash` so they can key maps without ceremony.
//! They are only ever minted by an [`IdSource`], which a registry owns; there
//! is no process-wide counter.

use std::cell::Cell;
use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Raw integer value, mostly useful for log fields.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identity of a registered behavior or component definition.
    ///
    /// Composition de-duplicates included behaviors by this id.
    pub struct BehaviorId(u32);
}

typed_id! {
    /// Identity of a trait descriptor.  Two descriptors are the same
    /// capability iff their ids are equal.
    pub struct TraitId(u32);
}

typed_id! {
    /// Identity of a live component instance.
    pub struct InstanceId(u32);
}

// ── IdSource ──────────────────────────────────────────────────────────────────

/// Monotonic id allocator.
///
/// Each id kind has its own counter.  Interior mutability lets a shared
/// `&IdSource` hand out ids while many builders borrow the same registry.
#[derive(Debug, Default)]
pub struct IdSource {
    behaviors: Cell<u32>,
    traits:    Cell<u32>,
    instances: Cell<u32>,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_behavior(&self) -> BehaviorId {
        BehaviorId(bump(&self.behaviors))
    }

    pub fn next_trait(&self) -> TraitId {
        TraitId(bump(&self.traits))
    }

    pub fn next_instance(&self) -> InstanceId {
        InstanceId(bump(&self.instances))
    }
}

fn bump(counter: &Cell<u32>) -> u32 {
    let id = counter.get();
    counter.set(id.wrapping_add(1));
    id
}
