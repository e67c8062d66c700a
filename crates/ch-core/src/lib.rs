//! `ch-core` — foundational types for the chaining composition framework.
//!
//! This crate is a dependency of every other `ch-*` crate.  It has no `ch-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `BehaviorId`, `TraitId`, `InstanceId`, `IdSource`         |
//! | [`callback`]    | `CallbackList<F>`, `InvokeReport`, `CallbackFault`        |
//! | [`method`]      | `TaggedMethod<F>`, `MethodTag`                            |
//! | [`lifetime`]    | `Lifetime`, `PageLifetime` event names                    |
//! | [`config`]      | `ComposeConfig`                                           |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `ComposeConfig`. |

pub mod callback;
pub mod config;
pub mod error;
pub mod ids;
pub mod lifetime;
pub mod method;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use callback::{CallbackFault, CallbackList, CallbackResult, InvokeReport, guarded};
pub use config::ComposeConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{BehaviorId, IdSource, InstanceId, TraitId};
pub use lifetime::{Lifetime, PageLifetime};
pub use method::{MethodTag, TaggedMethod};
