//! `ch-component` — builders, definitions, and live instances.
//!
//! # Flow
//!
//! ```text
//! Registry::behavior()/component()
//!   → Builder::{static_data, property, observer, lifetime, init, behavior, ...}
//!   → Builder::register()          flatten + validate, freeze into a Definition
//!   → Registry::instantiate()      clone tables, run inits, go Live, fire `created`
//!   → Component::{set_data, attached, show, call_method, destroy, ...}
//! ```
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`registry`]    | `Registry` — config, id source, definition store          |
//! | [`builder`]     | `Builder<K>`, `BehaviorHandle`, `ComponentHandle`         |
//! | [`classic`]     | `ClassicDefinition` — one-record form of a chain          |
//! | [`definition`]  | `Definition` — flattened, immutable composition           |
//! | [`instance`]    | `Component` — per-instance runtime                        |
//! | [`context`]     | `InitContext`, `InitExports`, `Exported`                  |
//! | [`meta`]        | `Phase`                                                   |
//! | [`hooks`]       | callback signatures and wrapping helpers                  |
//! | [`property`]    | `PropertyType`, `PropertyDef`                             |
//! | [`relation`]    | `RelationDescriptor`, `RelationKind`, `RelationEvent`     |
//! | [`options`]     | `ComponentOptions`                                        |
//! | [`error`]       | `BuildError`, `ComposeError`                              |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                      |
//! |-----------|-------------------------------------------------------------|
//! | `serde`   | Serde derives on `ComponentOptions` and `PropertyType`.     |
//! | `fx-hash` | FxHash for per-instance trait registries.                   |

pub mod builder;
pub mod classic;
pub mod context;
mod declaration;
pub mod definition;
pub mod error;
pub mod hooks;
pub mod instance;
pub mod meta;
pub mod options;
pub mod property;
pub mod registry;
pub mod relation;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::{
    BehaviorHandle, BehaviorKind, Builder, BuilderKind, ComponentHandle, ComponentKind,
    ObserverPaths,
};
pub use classic::ClassicDefinition;
pub use context::{Exported, InitContext, InitExports};
pub use definition::{Definition, DefinitionKind};
pub use error::{BuildError, BuildResult, ComposeError, ComposeResult};
pub use hooks::{
    ExportFn, InitFn, LifetimeFn, Method, MethodFn, ObserverFn, RelationFn, export_fn, method,
    observer_fn, tagged,
};
pub use instance::Component;
pub use meta::Phase;
pub use options::ComponentOptions;
pub use property::{PropertyDef, PropertyType};
pub use registry::Registry;
pub use relation::{RelationDescriptor, RelationEvent, RelationKind};
