//! `ch-path` — how a path string addresses a field inside component data.
//!
//! # Path syntax
//!
//! | Form       | Meaning                                                  |
//! |------------|----------------------------------------------------------|
//! | `a`        | top-level field                                          |
//! | `a.b`      | nested field                                             |
//! | `a[3]`     | array element (non-negative integer literal)             |
//! | `a.**`     | `a` itself and anything nested under it, at any depth    |
//! | `**`       | every field                                              |
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`path`]       | `Segment`, `DataPath` (parse / display)                    |
//! | [`key`]        | `ObserverKey` — the canonical `", "`-joined observer key   |
//! | [`overlap`]    | `Overlap` — does a change touch a watched path?            |
//! | [`shape`]      | `Shape` — structural model with bounded resolution depth   |
//! | [`tree`]       | read/write a `serde_json::Value` tree by `DataPath`        |
//! | [`error`]      | `PathError`, `PathResult`                                  |

pub mod error;
pub mod key;
pub mod overlap;
pub mod path;
pub mod shape;
pub mod tree;


pub use error::{PathError, PathResult};
pub use key::ObserverKey;
pub use overlap::Overlap;
pub use path::{DataPath, Segment};
pub use shape::Shape;
