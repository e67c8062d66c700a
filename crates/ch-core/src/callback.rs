//! Append-only ordered callback lists with per-callback fault isolation.
//!
//! # Design
//!
//! The callback sequence lives behind an `Rc<Vec<Rc<F>>>`.  [`Clone`] copies
//! the pointer, and [`CallbackList::add`] goes through [`Rc::make_mut`], so a
//! shared sequence is copied only on the next append to one of its clones.
//! This is what lets every component instance take its own copy of a frozen
//! definition's tables at creation time without disturbing the definition or
//! sibling instances.
//!
//! Dispatch never holds a borrow of the list's owner: callers clone the list
//! first and invoke the clone, so a callback may freely re-enter its receiver.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Return type of every behavior-authored callback.
pub type CallbackResult = anyhow::Result<()>;

// ── Faults ────────────────────────────────────────────────────────────────────

/// A failure raised by one callback and contained by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackFault {
    /// Position of the faulting callback inside its list.
    pub index:    usize,
    /// Rendered error or panic payload.
    pub message:  String,
    pub panicked: bool,
}

impl fmt::Display for CallbackFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.panicked { "panicked" } else { "failed" };
        write!(f, "callback #{} {kind}: {}", self.index, self.message)
    }
}

/// Aggregate outcome of invoking a whole list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvokeReport {
    /// Number of callbacks that were called (faulting ones included).
    pub invoked: usize,
    pub faults:  Vec<CallbackFault>,
}

impl InvokeReport {
    /// `true` when no callback failed.
    pub fn is_ok(&self) -> bool {
        self.faults.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: InvokeReport) {
        self.invoked += other.invoked;
        self.faults.extend(other.faults);
    }
}

/// Run a single callback, converting an `Err` or (optionally) a panic into a
/// [`CallbackFault`].  The fault is logged under `label`.
pub fn guarded(
    label:        &str,
    index:        usize,
    catch_panics: bool,
    call:         impl FnOnce() -> CallbackResult,
) -> Result<(), CallbackFault> {
    let outcome = if catch_panics {
        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(result) => result.map_err(|e| (format!("{e:#}"), false)),
            Err(payload) => Err((panic_message(payload.as_ref()), true)),
        }
    } else {
        call().map_err(|e| (format!("{e:#}"), false))
    };

    outcome.map_err(|(message, panicked)| {
        tracing::error!(list = label, index, panicked, "callback fault: {message}");
        CallbackFault { index, message, panicked }
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

// ── CallbackList ──────────────────────────────────────────────────────────────

/// An ordered, append-only list of callbacks of type `F`.
///
/// `F` is normally an unsized `dyn Fn(..)` type; the list does not care about
/// the call signature, which is supplied at [`invoke_with`](Self::invoke_with)
/// time.
pub struct CallbackList<F: ?Sized> {
    callbacks: Option<Rc<Vec<Rc<F>>>>,
}

impl<F: ?Sized> CallbackList<F> {
    pub fn new() -> Self {
        Self { callbacks: None }
    }

    /// Append `callback`.  Copies the shared sequence first if another clone
    /// still references it.
    pub fn add(&mut self, callback: Rc<F>) {
        match &mut self.callbacks {
            Some(seq) => Rc::make_mut(seq).push(callback),
            None => self.callbacks = Some(Rc::new(vec![callback])),
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.as_ref().map_or(0, |seq| seq.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if both lists currently share one callback sequence.
    pub fn shares_with(&self, other: &Self) -> bool {
        match (&self.callbacks, &other.callbacks) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<F>> {
        self.callbacks.iter().flat_map(|seq| seq.iter())
    }

    /// Call every callback in registration order through `call`.
    ///
    /// A callback that returns `Err` (or panics, when `catch_panics` is set)
    /// is logged and recorded in the report; the remaining callbacks still
    /// run.
    pub fn invoke_with(
        &self,
        label:        &str,
        catch_panics: bool,
        mut call:     impl FnMut(&F) -> CallbackResult,
    ) -> InvokeReport {
        let mut report = InvokeReport::default();
        let Some(seq) = self.callbacks.clone() else {
            return report;
        };
        for (index, callback) in seq.iter().enumerate() {
            report.invoked += 1;
            if let Err(fault) = guarded(label, index, catch_panics, || call(&**callback)) {
                report.faults.push(fault);
            }
        }
        report
    }
}

impl<F: ?Sized> Clone for CallbackList<F> {
    fn clone(&self) -> Self {
        Self { callbacks: self.callbacks.clone() }
    }
}

impl<F: ?Sized> Default for CallbackList<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for CallbackList<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList").field("len", &self.len()).finish()
    }
}
