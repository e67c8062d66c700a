//! Canonical observer keys.
//!
//! An observer registration names one or more paths.  They are joined with
//! `", "` into a single key string, and that string is what indexes the
//! observer table: a later registration must spell the key identically,
//! character for character, to reach the same callback list.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{DataPath, PathError, PathResult};

/// A normalised observer key plus the paths it watches.
#[derive(Clone, Debug)]
pub struct ObserverKey {
    text:  String,
    paths: Vec<DataPath>,
}

impl ObserverKey {
    /// Join `paths` with `", "` and parse every comma-separated member.
    ///
    /// A single string that already contains commas (`"a, b"`) produces the
    /// same key as the two-element list `["a", "b"]`.
    pub fn new<I, S>(paths: I) -> PathResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = paths.into_iter().map(|p| p.as_ref().to_owned()).collect();
        Self::parse(&parts.join(", "))
    }

    pub fn parse(text: &str) -> PathResult<Self> {
        if text.trim().is_empty() {
            return Err(PathError::Empty);
        }
        let paths = text
            .split(',')
            .map(|member| DataPath::parse(member.trim()))
            .collect::<PathResult<Vec<_>>>()?;
        Ok(Self { text: text.to_owned(), paths })
    }

    /// The catch-all `**` key every builder declares implicitly.
    pub fn everything() -> Self {
        Self { text: "**".to_owned(), paths: vec![DataPath::everything()] }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn paths(&self) -> &[DataPath] {
        &self.paths
    }
}

impl PartialEq for ObserverKey {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for ObserverKey {}

impl Hash for ObserverKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Borrow<str> for ObserverKey {
    fn borrow(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ObserverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
