//! Composition configuration shared by every builder a registry creates.

use crate::{CoreError, CoreResult};

/// Paths nested deeper than this resolve to an unconstrained shape.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 4;

/// Knobs for the composition engine.
///
/// The defaults match the behavior most hosts expect; tests and tools may
/// tighten or loosen them through the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComposeConfig {
    /// Maximum number of path segments the shape model resolves precisely.
    /// Deeper paths resolve to `Shape::Any`.
    pub max_path_depth: usize,

    /// Check at `register()` that every observer path resolves against the
    /// declared static data and properties.
    pub validate_observer_paths: bool,

    /// Catch panics raised by individual callbacks and record them as
    /// faults.  When off, a panicking callback unwinds through the dispatcher.
    pub catch_panics: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            max_path_depth:          DEFAULT_MAX_PATH_DEPTH,
            validate_observer_paths: true,
            catch_panics:            true,
        }
    }
}

impl ComposeConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_path_depth == 0 {
            return Err(CoreError::Config("max_path_depth must be at least 1".into()));
        }
        Ok(())
    }
}
