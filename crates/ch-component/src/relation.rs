//! Relation descriptors.
//!
//! The host decides when two components are related; this crate only stores
//! the descriptor and forwards `linked`/`link_changed`/`unlinked` events to
//! its handlers.

use std::fmt;
use std::rc::Rc;

use ch_core::{CallbackResult, InstanceId};

use crate::{Component, RelationFn};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RelationKind {
    Parent,
    Child,
    Ancestor,
    Descendant,
}

/// Relation events dispatched by the host.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RelationEvent {
    Linked,
    LinkChanged,
    Unlinked,
}

impl RelationEvent {
    pub fn name(self) -> &'static str {
        match self {
            RelationEvent::Linked => "linked",
            RelationEvent::LinkChanged => "link_changed",
            RelationEvent::Unlinked => "unlinked",
        }
    }
}

#[derive(Clone)]
pub struct RelationDescriptor {
    kind:         RelationKind,
    target:       Option<String>,
    linked:       Option<Rc<RelationFn>>,
    link_changed: Option<Rc<RelationFn>>,
    unlinked:     Option<Rc<RelationFn>>,
}

impl RelationDescriptor {
    pub fn new(kind: RelationKind) -> Self {
        Self { kind, target: None, linked: None, link_changed: None, unlinked: None }
    }

    /// Relate to a target other than the one named by the relation key.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn on_linked<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Component, InstanceId) -> CallbackResult + 'static,
    {
        self.linked = Some(Rc::new(f));
        self
    }

    pub fn on_link_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Component, InstanceId) -> CallbackResult + 'static,
    {
        self.link_changed = Some(Rc::new(f));
        self
    }

    pub fn on_unlinked<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Component, InstanceId) -> CallbackResult + 'static,
    {
        self.unlinked = Some(Rc::new(f));
        self
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub(crate) fn handler(&self, event: RelationEvent) -> Option<&Rc<RelationFn>> {
        match event {
            RelationEvent::Linked => self.linked.as_ref(),
            RelationEvent::LinkChanged => self.link_changed.as_ref(),
            RelationEvent::Unlinked => self.unlinked.as_ref(),
        }
    }
}

impl fmt::Debug for RelationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationDescriptor")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
