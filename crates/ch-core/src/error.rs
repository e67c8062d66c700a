//! Framework-level error type.
//!
//! Higher crates define their own error enums and wrap `CoreError` through a
//! `#[from]` variant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown lifetime `{0}` (expected created, attached, moved, detached or ready)")]
    UnknownLifetime(String),

    #[error("unknown page lifetime `{0}` (expected show, hide or resize)")]
    UnknownPageLifetime(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ch-core`.
pub type CoreResult<T> = Result<T, CoreError>;
