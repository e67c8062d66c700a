//! Explicit "declared method" marker for callables returned from init
//! functions.
//!
//! An init function may hand back any number of named values.  Only the ones
//! wrapped by [`TaggedMethod::tag`] (the context's `method`/`listener`
//! helpers) become public methods of the instance; everything else is
//! ignored.

use std::fmt;
use std::rc::Rc;

/// How a tagged callable is meant to be used.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MethodTag {
    /// A public method callable on the instance.
    Method,
    /// An event listener; attached to the method table the same way.
    Listener,
}

/// A callable together with its optional declared-method tag.
pub struct TaggedMethod<F: ?Sized> {
    func: Rc<F>,
    tag:  Option<MethodTag>,
}

impl<F: ?Sized> TaggedMethod<F> {
    pub fn tag(func: Rc<F>, tag: MethodTag) -> Self {
        Self { func, tag: Some(tag) }
    }

    /// Wrap `func` without a tag.  Untagged values are never exported.
    pub fn untagged(func: Rc<F>) -> Self {
        Self { func, tag: None }
    }

    /// Test for the marker without calling the function.
    pub fn is_tagged(&self) -> bool {
        self.tag.is_some()
    }

    pub fn kind(&self) -> Option<MethodTag> {
        self.tag
    }

    pub fn func(&self) -> &Rc<F> {
        &self.func
    }

    pub fn into_func(self) -> Rc<F> {
        self.func
    }
}

impl<F: ?Sized> Clone for TaggedMethod<F> {
    fn clone(&self) -> Self {
        Self { func: Rc::clone(&self.func), tag: self.tag }
    }
}

impl<F: ?Sized> fmt::Debug for TaggedMethod<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedMethod").field("tag", &self.tag).finish_non_exhaustive()
    }
}
