//! Classic definition objects.
//!
//! A [`ClassicDefinition`] describes a behavior or component as one record of
//! optional categories instead of a chain of calls.  Applying it with
//! [`Builder::definition`](crate::Builder::definition) appends declarations in
//! a fixed category order:
//!
//! behaviors → properties → data → observers → methods → lifetime shorthands
//! → lifetimes → page lifetimes → relations → external classes → export.
//!
//! Lifetime handlers appear either as shorthand fields (`created`,
//! `attached`, ...) or in the `lifetimes` table.  When both name the same
//! lifetime, the table entry is used and the shorthand is dropped.

use std::rc::Rc;

use ch_core::{Lifetime, PageLifetime};
use ch_path::ObserverKey;
use indexmap::IndexMap;
use serde_json::Value;

use crate::declaration::Declaration;
use crate::{
    BehaviorHandle, BuildError, BuildResult, ComponentOptions, ExportFn, LifetimeFn, Method,
    ObserverFn, PropertyDef, RelationDescriptor,
};

/// Every category a classic definition may carry.
///
/// Lifetime and page-lifetime tables are keyed by event name (`"attached"`,
/// `"show"`); an unknown name fails registration.
#[derive(Clone, Default)]
pub struct ClassicDefinition {
    pub behaviors:        Vec<BehaviorHandle>,
    pub properties:       IndexMap<String, PropertyDef>,
    /// Static data; must be a JSON object when present.
    pub data:             Option<Value>,
    /// Observers keyed by their path string (`"a.b, c"`).
    pub observers:        IndexMap<String, Rc<ObserverFn>>,
    pub methods:          IndexMap<String, Method>,
    pub created:          Option<Rc<LifetimeFn>>,
    pub attached:         Option<Rc<LifetimeFn>>,
    pub ready:            Option<Rc<LifetimeFn>>,
    pub moved:            Option<Rc<LifetimeFn>>,
    pub detached:         Option<Rc<LifetimeFn>>,
    pub lifetimes:        IndexMap<String, Rc<LifetimeFn>>,
    pub page_lifetimes:   IndexMap<String, Rc<LifetimeFn>>,
    pub relations:        IndexMap<String, RelationDescriptor>,
    pub external_classes: Vec<String>,
    pub export:           Option<Rc<ExportFn>>,
    /// Honoured by component builders only.
    pub options:          Option<ComponentOptions>,
}

impl ClassicDefinition {
    /// Lower into declarations, plus the options to apply (if any).
    pub(crate) fn into_declarations(
        self,
    ) -> BuildResult<(Vec<Declaration>, Option<ComponentOptions>)> {
        let mut out = Vec::new();

        out.extend(self.behaviors.into_iter().map(Declaration::Include));
        out.extend(
            self.properties.into_iter().map(|(name, def)| Declaration::Property(name, def)),
        );

        match self.data {
            None => {}
            Some(Value::Object(map)) => out.push(Declaration::StaticData(map)),
            Some(other) => {
                let found = crate::error::kind_of(&other);
                return Err(BuildError::StaticDataNotObject { found });
            }
        }

        for (text, f) in self.observers {
            out.push(Declaration::Observer(ObserverKey::parse(&text)?, f));
        }

        if !self.methods.is_empty() {
            out.push(Declaration::Methods(self.methods.into_iter().collect()));
        }

        let shorthands = [
            (Lifetime::Created, self.created),
            (Lifetime::Attached, self.attached),
            (Lifetime::Ready, self.ready),
            (Lifetime::Moved, self.moved),
            (Lifetime::Detached, self.detached),
        ];
        for (lifetime, f) in shorthands {
            let Some(f) = f else { continue };
            if self.lifetimes.contains_key(lifetime.name()) {
                continue;
            }
            out.push(Declaration::Lifetime(lifetime, f));
        }
        for (name, f) in self.lifetimes {
            out.push(Declaration::Lifetime(name.parse::<Lifetime>()?, f));
        }
        for (name, f) in self.page_lifetimes {
            out.push(Declaration::PageLifetime(name.parse::<PageLifetime>()?, f));
        }

        out.extend(
            self.relations.into_iter().map(|(name, rel)| Declaration::Relation(name, rel)),
        );
        if !self.external_classes.is_empty() {
            out.push(Declaration::ExternalClasses(self.external_classes));
        }
        if let Some(f) = self.export {
            out.push(Declaration::Export(f));
        }

        Ok((out, self.options))
    }
}
