//! Names of host-dispatched lifecycle events.
//!
//! Only the recognised names are representable; string names coming from
//! classic definitions are parsed with [`str::parse`] and rejected otherwise.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Component lifetimes, in the order a host normally dispatches them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Lifetime {
    Created,
    Attached,
    Moved,
    Detached,
    Ready,
}

impl Lifetime {
    pub const ALL: [Lifetime; 5] = [
        Lifetime::Created,
        Lifetime::Attached,
        Lifetime::Moved,
        Lifetime::Detached,
        Lifetime::Ready,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Lifetime::Created  => "created",
            Lifetime::Attached => "attached",
            Lifetime::Moved    => "moved",
            Lifetime::Detached => "detached",
            Lifetime::Ready    => "ready",
        }
    }
}

impl FromStr for Lifetime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lifetime::ALL
            .into_iter()
            .find(|l| l.name() == s)
            .ok_or_else(|| CoreError::UnknownLifetime(s.to_owned()))
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifetimes of the page (surface) hosting a component.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PageLifetime {
    Show,
    Hide,
    /// Carries the new surface size as its argument.
    Resize,
}

impl PageLifetime {
    pub const ALL: [PageLifetime; 3] = [PageLifetime::Show, PageLifetime::Hide, PageLifetime::Resize];

    pub fn name(self) -> &'static str {
        match self {
            PageLifetime::Show   => "show",
            PageLifetime::Hide   => "hide",
            PageLifetime::Resize => "resize",
        }
    }
}

impl FromStr for PageLifetime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageLifetime::ALL
            .into_iter()
            .find(|l| l.name() == s)
            .ok_or_else(|| CoreError::UnknownPageLifetime(s.to_owned()))
    }
}

impl fmt::Display for PageLifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
