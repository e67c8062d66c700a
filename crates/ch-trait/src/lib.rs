//! `ch-trait` — decoupled capability discovery between composed behaviors.
//!
//! One behavior declares an abstract capability by sharing a
//! [`TraitBehavior`] descriptor; any other behavior composed into the same
//! component supplies an implementation with `implement`; consumers look it
//! up by descriptor.  Neither side needs to know about the other beyond the
//! descriptor value.
//!
//! # Crate layout
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`descriptor`]  | `TraitBehavior<In, Out>` — identity + transform        |
//! | [`group`]       | `TraitGroup` — per-instance descriptor → impl registry |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | Uses FxHash for the implementation map.                 |

pub mod descriptor;
pub mod group;


pub use descriptor::TraitBehavior;
pub use group::TraitGroup;
