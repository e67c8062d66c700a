//! Does a changed path touch a watched path?

use crate::DataPath;

/// Relation between a watched path and a path written by a data update.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Overlap {
    /// No relation; the watcher is unaffected.
    None,
    /// The written path is the watched path.
    Exact,
    /// The written path is nested under a deep (`.**`) watched path.
    Descendant,
    /// The written path is a strict ancestor of the watched path.  The
    /// watched value may or may not have changed; callers compare old and
    /// new values to decide.
    Ancestor,
}

impl Overlap {
    /// `true` when the watcher fires without a value comparison.
    pub fn is_direct(self) -> bool {
        matches!(self, Overlap::Exact | Overlap::Descendant)
    }
}

impl DataPath {
    /// Classify how a write to `changed` relates to `self` (the watched path).
    pub fn overlap(&self, changed: &DataPath) -> Overlap {
        let watched = self.segments();
        let written = changed.segments();
        if watched == written {
            Overlap::Exact
        } else if written.starts_with(watched) {
            if self.is_deep() { Overlap::Descendant } else { Overlap::None }
        } else if watched.starts_with(written) {
            Overlap::Ancestor
        } else {
            Overlap::None
        }
    }
}
