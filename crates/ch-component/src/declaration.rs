//! The closed set of things a builder chain can declare.
//!
//! A chain is recorded as an ordered list of [`Declaration`]s.  Composing a
//! behavior records an `Include` at that position, so the behavior's own
//! declarations land as one contiguous block ahead of whatever the chain
//! declares afterwards.

use std::rc::Rc;

use ch_core::{Lifetime, PageLifetime};
use ch_path::ObserverKey;
use serde_json::{Map, Value};

use crate::{
    BehaviorHandle, ExportFn, InitFn, LifetimeFn, Method, ObserverFn, PropertyDef,
    RelationDescriptor,
};

#[derive(Clone)]
pub(crate) enum Declaration {
    StaticData(Map<String, Value>),
    Property(String, PropertyDef),
    Methods(Vec<(String, Method)>),
    Observer(ObserverKey, Rc<ObserverFn>),
    Lifetime(Lifetime, Rc<LifetimeFn>),
    PageLifetime(PageLifetime, Rc<LifetimeFn>),
    Relation(String, RelationDescriptor),
    Export(Rc<ExportFn>),
    Init(Rc<InitFn>),
    ExternalClasses(Vec<String>),
    Include(BehaviorHandle),
}
