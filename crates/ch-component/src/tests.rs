//! Unit and scenario tests for ch-component.

#[cfg(test)]
mod support {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ch_core::CallbackResult;
    use serde_json::Value;

    use crate::{Component, ComposeResult, InitContext, InitExports};

    pub type Log = Rc<RefCell<Vec<&'static str>>>;

    pub fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    pub fn take(log: &Log) -> Vec<&'static str> {
        std::mem::take(&mut *log.borrow_mut())
    }

    /// An init function that only records `tag`.
    pub fn init_tag(
        log: &Log,
        tag: &'static str,
    ) -> impl Fn(&mut InitContext<'_>) -> ComposeResult<InitExports> + 'static {
        let log = Rc::clone(log);
        move |_ctx: &mut InitContext<'_>| {
            log.borrow_mut().push(tag);
            Ok(InitExports::none())
        }
    }

    /// A lifetime handler that only records `tag`.
    pub fn hook_tag(
        log: &Log,
        tag: &'static str,
    ) -> impl Fn(&mut Component, &Value) -> CallbackResult + 'static {
        let log = Rc::clone(log);
        move |_comp: &mut Component, _arg: &Value| {
            log.borrow_mut().push(tag);
            Ok(())
        }
    }

    /// An observer that only records `tag`.
    pub fn watch_tag(
        log: &Log,
        tag: &'static str,
    ) -> impl Fn(&mut Component, &[Value]) -> CallbackResult + 'static {
        let log = Rc::clone(log);
        move |_comp: &mut Component, _values: &[Value]| {
            log.borrow_mut().push(tag);
            Ok(())
        }
    }
}

#[cfg(test)]
mod composition {
    use super::support::{init_tag, log};
    use crate::{InitContext, InitExports, Registry};

    #[test]
    fn init_fns_run_in_flattened_order() {
        let reg = Registry::new();
        let log = log();
        let a = reg.behavior().init(init_tag(&log, "a")).register().unwrap();
        let b = reg.behavior().behavior(&a).init(init_tag(&log, "b")).register().unwrap();
        let comp = reg
            .component()
            .init(init_tag(&log, "c0"))
            .behavior(&b)
            .init(init_tag(&log, "c1"))
            .register()
            .unwrap();

        reg.instantiate(&comp).unwrap();
        assert_eq!(*log.borrow(), ["c0", "a", "b", "c1"]);
    }

    #[test]
    fn diamond_behavior_contributes_once() {
        let reg = Registry::new();
        let log = log();
        let base = reg.behavior().init(init_tag(&log, "base")).register().unwrap();
        let left = reg.behavior().behavior(&base).init(init_tag(&log, "left")).register().unwrap();
        let right = reg.behavior().behavior(&base).init(init_tag(&log, "right")).register().unwrap();
        let comp = reg.component().behavior(&left).behavior(&right).register().unwrap();

        reg.instantiate(&comp).unwrap();
        assert_eq!(*log.borrow(), ["base", "left", "right"]);
        assert_eq!(
            comp.definition().members(),
            [base.definition().id(), left.definition().id(), right.definition().id()]
        );
    }

    #[test]
    fn repeated_behavior_is_skipped() {
        let reg = Registry::new();
        let log = log();
        let a = reg.behavior().init(init_tag(&log, "a")).register().unwrap();
        let comp = reg.component().behavior(&a).behavior(&a).register().unwrap();
        reg.instantiate(&comp).unwrap();
        assert_eq!(*log.borrow(), ["a"]);
    }

    #[test]
    fn later_trait_implementation_wins() {
        let reg = Registry::new();
        let name = reg.trait_behavior::<String>();

        let implement = |value: &'static str| {
            let name = name.clone();
            reg.behavior()
                .init(move |ctx: &mut InitContext<'_>| {
                    ctx.implement(&name, value.to_owned())?;
                    Ok(InitExports::none())
                })
                .register()
                .unwrap()
        };
        let first = implement("first");
        let second = implement("second");

        let forward = reg.component().behavior(&first).behavior(&second).register().unwrap();
        let inst = reg.instantiate(&forward).unwrap();
        assert_eq!(inst.trait_behavior(&name).as_deref(), Some("second"));

        let reverse = reg.component().behavior(&second).behavior(&first).register().unwrap();
        let inst = reg.instantiate(&reverse).unwrap();
        assert_eq!(inst.trait_behavior(&name).as_deref(), Some("first"));
    }

    #[test]
    fn unimplemented_trait_is_absent() {
        let reg = Registry::new();
        let name = reg.trait_behavior::<String>();
        let comp = reg.component().register().unwrap();
        let inst = reg.instantiate(&comp).unwrap();
        assert!(inst.trait_behavior(&name).is_none());
    }

    #[test]
    fn trait_transform_applies_on_implement() {
        let reg = Registry::new();
        let doubled = reg.trait_behavior_with(|n: u32| n * 2);
        let d = doubled.clone();
        let comp = reg
            .component()
            .init(move |ctx: &mut InitContext<'_>| {
                ctx.implement(&d, 21)?;
                Ok(InitExports::none())
            })
            .register()
            .unwrap();
        let inst = reg.instantiate(&comp).unwrap();
        assert_eq!(inst.trait_behavior(&doubled), Some(42));
    }

    #[test]
    fn failing_init_aborts_instantiation() {
        let reg = Registry::new();
        let comp = reg
            .component()
            .init(|_ctx: &mut InitContext<'_>| Err(anyhow::anyhow!("no backend").into()))
            .register()
            .unwrap();
        let err = reg.instantiate(&comp).unwrap_err();
        assert_eq!(err.to_string(), "no backend");
    }
}

#[cfg(test)]
mod properties {
    use serde_json::json;

    use crate::{BuildError, ComposeError, PropertyDef, PropertyType, Registry};

    #[test]
    fn duplicate_property_in_one_chain() {
        let reg = Registry::new();
        let err = reg
            .behavior()
            .property("x", PropertyType::Number)
            .property("x", PropertyType::String)
            .register()
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::DuplicateProperty { ref name } if name == "x"));
    }

    #[test]
    fn duplicate_property_across_behaviors() {
        let reg = Registry::new();
        let b1 = reg.behavior().property("x", PropertyType::Number).register().unwrap();
        let b2 = reg.behavior().property("x", PropertyType::Number).register().unwrap();
        let err = reg.component().behavior(&b1).behavior(&b2).register().err().unwrap();
        assert!(matches!(err, BuildError::DuplicateProperty { ref name } if name == "x"));
    }

    #[test]
    fn shared_behavior_does_not_duplicate_its_properties() {
        let reg = Registry::new();
        let base = reg.behavior().property("x", PropertyType::Number).register().unwrap();
        let left = reg.behavior().behavior(&base).register().unwrap();
        let right = reg.behavior().behavior(&base).register().unwrap();
        assert!(reg.component().behavior(&left).behavior(&right).register().is_ok());
    }

    #[test]
    fn defaults_seed_instance_data() {
        let reg = Registry::new();
        let comp = reg
            .component()
            .property("count", PropertyType::Number)
            .property("label", PropertyDef::new(PropertyType::String).with_value(json!("hi")))
            .property("config", PropertyType::Object)
            .register()
            .unwrap();
        let inst = reg.instantiate(&comp).unwrap();
        assert_eq!(*inst.data(), json!({ "count": 0, "label": "hi", "config": null }));
        assert_eq!(comp.definition().property_names().collect::<Vec<_>>(), ["count", "label", "config"]);
    }

    #[test]
    fn mistyped_default_fails_register() {
        let reg = Registry::new();
        let err = reg
            .component()
            .property("n", PropertyDef::new(PropertyType::Number).with_value(json!("ten")))
            .register()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            BuildError::PropertyDefault { expected: PropertyType::Number, found: "string", .. }
        ));
    }

    #[test]
    fn set_property_checks_type() {
        let reg = Registry::new();
        let comp = reg.component().property("n", PropertyType::Number).register().unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        let err = inst.set_property("n", json!("x")).unwrap_err();
        assert!(matches!(err, ComposeError::PropertyType { found: "string", .. }));
        let err = inst.set_property("m", json!(1)).unwrap_err();
        assert!(matches!(err, ComposeError::UnknownProperty { .. }));

        inst.set_property("n", json!(5)).unwrap();
        assert_eq!(inst.data()["n"], 5);
    }
}

#[cfg(test)]
mod data {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use ch_core::ComposeConfig;
    use ch_path::PathError;
    use serde_json::{Value, json};

    use super::support::{log, take, watch_tag};
    use crate::{BuildError, Component, ComposeError, InitContext, InitExports, Registry};

    #[test]
    fn set_data_fails_while_constructing() {
        let reg = Registry::new();
        let rejected = Rc::new(Cell::new(false));
        let flag = Rc::clone(&rejected);
        let comp = reg
            .component()
            .static_data(json!({ "a": 0 }))
            .init(move |ctx: &mut InitContext<'_>| {
                let err = ctx.set_data(json!({ "a": 1 })).unwrap_err();
                flag.set(matches!(err, ComposeError::NotLive { op: "set_data" }));
                Ok(InitExports::none())
            })
            .register()
            .unwrap();

        let mut inst = reg.instantiate(&comp).unwrap();
        assert!(rejected.get());
        assert_eq!(inst.data()["a"], 0);

        inst.set_data(json!({ "a": 1 })).unwrap();
        assert_eq!(inst.data()["a"], 1);
    }

    fn nested(reg: &Registry, log: &super::support::Log) -> Component {
        let comp = reg
            .component()
            .static_data(json!({ "a": { "b": 1, "c": 2 }, "c": 0 }))
            .observer("a.b", watch_tag(log, "a.b"))
            .observer("a.**", watch_tag(log, "a.**"))
            .observer("a.c", watch_tag(log, "a.c"))
            .register()
            .unwrap();
        reg.instantiate(&comp).unwrap()
    }

    #[test]
    fn observers_fire_on_overlapping_paths() {
        let reg = Registry::new();
        let log = log();
        let mut inst = nested(&reg, &log);

        let report = inst.set_data(json!({ "a.b": 5 })).unwrap();
        assert_eq!(take(&log), ["a.b", "a.**"]);
        assert_eq!(report.invoked, 2);

        inst.set_data(json!({ "c": 3 })).unwrap();
        assert!(take(&log).is_empty());
    }

    #[test]
    fn wholesale_write_fires_only_changed_children() {
        let reg = Registry::new();
        let log = log();
        let mut inst = nested(&reg, &log);

        inst.set_data(json!({ "a": { "b": 1, "c": 2, "d": 9 } })).unwrap();
        assert_eq!(take(&log), ["a.**"]);

        inst.set_data(json!({ "a": { "b": 1, "c": 7 } })).unwrap();
        assert_eq!(take(&log), ["a.**", "a.c"]);
    }

    #[test]
    fn observer_receives_current_values_in_key_order() {
        let reg = Registry::new();
        let seen: Rc<RefCell<Vec<Value>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let comp = reg
            .component()
            .static_data(json!({ "a": { "b": 1 }, "c": "x" }))
            .observer(["c", "a.b"], move |_comp, values| {
                sink.borrow_mut().extend_from_slice(values);
                Ok(())
            })
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        inst.set_data(json!({ "a.b": 2 })).unwrap();
        assert_eq!(*seen.borrow(), [json!("x"), json!(2)]);
        assert!(comp.definition().declares_observer("c, a.b"));
    }

    #[test]
    fn everything_observer_fires_on_any_write() {
        let reg = Registry::new();
        let log = log();
        let comp = reg
            .component()
            .static_data(json!({ "a": 0, "list": [] }))
            .observer("**", watch_tag(&log, "all"))
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        inst.set_data(json!({ "a": 1 })).unwrap();
        inst.set_data(json!({ "list[0]": "first" })).unwrap();
        assert_eq!(take(&log), ["all", "all"]);
        assert_eq!(inst.data()["list"], json!(["first"]));
    }

    #[test]
    fn failed_batch_leaves_data_untouched() {
        let reg = Registry::new();
        let log = log();
        let mut inst = nested(&reg, &log);

        let err = inst.set_data(json!({ "a.b": 100, "c.x": 1 })).unwrap_err();
        assert!(matches!(err, ComposeError::Path(PathError::NotAContainer { .. })));
        assert_eq!(inst.data()["a"]["b"], 1);
        assert!(take(&log).is_empty());

        let err = inst.set_data(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidUpdate { found: "array" }));
    }

    #[test]
    fn completion_callback_runs_after_observers() {
        let reg = Registry::new();
        let log = log();
        let mut inst = nested(&reg, &log);

        let sink = Rc::clone(&log);
        let report = inst
            .set_data_then(json!({ "a.c": 3 }), move |_comp| {
                sink.borrow_mut().push("done");
                Ok(())
            })
            .unwrap();
        assert_eq!(take(&log), ["a.**", "a.c", "done"]);
        assert_eq!(report.invoked, 3);
    }

    #[test]
    fn unknown_observer_path_fails_register() {
        let reg = Registry::new();
        let log = log();
        let err = reg
            .component()
            .static_data(json!({ "a": { "b": 1 } }))
            .observer("a.z", watch_tag(&log, "z"))
            .register()
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::UnknownObserverPath { ref path, .. } if path == "a.z"));

        let lax = Registry::with_config(ComposeConfig {
            validate_observer_paths: false,
            ..ComposeConfig::default()
        })
        .unwrap();
        assert!(lax.component().observer("a.z", watch_tag(&log, "z")).register().is_ok());
    }

    #[test]
    fn paths_past_max_depth_resolve_to_any() {
        let reg = Registry::new();
        let log = log();
        let data = json!({ "a": { "b": { "c": { "d": { "e": 1 } } } } });
        let deep = reg
            .component()
            .static_data(data.clone())
            .observer("a.b.c.d.e.f", watch_tag(&log, "deep"))
            .register();
        assert!(deep.is_ok());

        let shallow = reg
            .component()
            .static_data(data)
            .observer("a.b.z", watch_tag(&log, "shallow"))
            .register();
        assert!(shallow.is_err());
    }

    #[test]
    fn malformed_path_is_held_until_register() {
        let reg = Registry::new();
        let log = log();
        let err = reg
            .component()
            .observer("a..b", watch_tag(&log, "x"))
            .static_data(json!({ "a": 1 }))
            .register()
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::Path(PathError::EmptySegment { .. })));
    }

    #[test]
    fn static_data_must_be_an_object() {
        let reg = Registry::new();
        let err = reg.behavior().static_data(json!(3)).register().err().unwrap();
        assert!(matches!(err, BuildError::StaticDataNotObject { found: "number" }));
    }

    #[test]
    fn later_static_data_overwrites_per_field() {
        let reg = Registry::new();
        let comp = reg
            .component()
            .static_data(json!({ "a": 1, "b": 1 }))
            .static_data(json!({ "b": 2 }))
            .register()
            .unwrap();
        assert_eq!(comp.definition().initial_data(), json!({ "a": 1, "b": 2 }));
    }
}

#[cfg(test)]
mod lifetimes {
    use std::cell::Cell;
    use std::rc::Rc;

    use anyhow::bail;
    use ch_core::{Lifetime, PageLifetime};
    use serde_json::{Value, json};

    use super::support::{hook_tag, log, take, watch_tag};
    use crate::{ComposeError, InitContext, InitExports, Phase, PropertyType, Registry};

    #[test]
    fn attached_fault_does_not_stop_siblings() {
        let reg = Registry::new();
        let log = log();
        let faulty = reg
            .behavior()
            .lifetime(Lifetime::Attached, |_comp, _arg| bail!("boom"))
            .register()
            .unwrap();
        let healthy = reg
            .behavior()
            .lifetime(Lifetime::Attached, hook_tag(&log, "healthy"))
            .register()
            .unwrap();
        let comp = reg.component().behavior(&faulty).behavior(&healthy).register().unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        let report = inst.attached().unwrap();
        assert_eq!(take(&log), ["healthy"]);
        assert_eq!(report.invoked, 2);
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].index, 0);
        assert_eq!(report.faults[0].message, "boom");
        assert!(!report.is_ok());
    }

    #[test]
    fn panicking_handler_is_contained() {
        let reg = Registry::new();
        let log = log();
        let comp = reg
            .component()
            .lifetime(Lifetime::Ready, |_comp, _arg| panic!("ready exploded"))
            .lifetime(Lifetime::Ready, hook_tag(&log, "after"))
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        let report = inst.ready().unwrap();
        assert_eq!(take(&log), ["after"]);
        assert!(report.faults[0].panicked);
        assert_eq!(report.faults[0].message, "ready exploded");
    }

    #[test]
    fn leaf_static_data_and_lifetime_order() {
        let reg = Registry::new();
        let log = log();
        let b1 = reg
            .behavior()
            .property("x", PropertyType::Number)
            .static_data(json!({ "y": 1 }))
            .register()
            .unwrap();
        let inherited = Rc::clone(&log);
        let b2 = reg
            .behavior()
            .behavior(&b1)
            .lifetime(Lifetime::Attached, move |comp, _arg| {
                inherited.borrow_mut().push("b2");
                let y = comp.data()["y"].as_i64().unwrap_or_default();
                comp.set_data(json!({ "y": y + 1 }))?;
                Ok(())
            })
            .register()
            .unwrap();
        let comp = reg
            .component()
            .behavior(&b2)
            .static_data(json!({ "y": 10 }))
            .lifetime(Lifetime::Attached, hook_tag(&log, "leaf"))
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        let report = inst.attached().unwrap();
        assert!(report.is_ok());
        assert_eq!(inst.data()["y"], 11);
        assert_eq!(take(&log), ["b2", "leaf"]);
    }

    #[test]
    fn created_runs_after_inits_on_a_live_instance() {
        let reg = Registry::new();
        let log = log();
        let sink = Rc::clone(&log);
        let comp = reg
            .component()
            .static_data(json!({ "ready": false }))
            .lifetime(Lifetime::Created, move |comp, _arg| {
                sink.borrow_mut().push("created");
                comp.set_data(json!({ "ready": true }))?;
                Ok(())
            })
            .init(super::support::init_tag(&log, "init"))
            .register()
            .unwrap();
        let inst = reg.instantiate(&comp).unwrap();
        assert_eq!(take(&log), ["init", "created"]);
        assert_eq!(inst.data()["ready"], true);
        assert_eq!(inst.phase(), Phase::Live);
    }

    #[test]
    fn instance_registrations_stay_private() {
        let reg = Registry::new();
        let made = Rc::new(Cell::new(0));
        let counter = Rc::clone(&made);
        let comp = reg
            .component()
            .lifetime(Lifetime::Attached, |_comp, _arg| Ok(()))
            .init(move |ctx: &mut InitContext<'_>| {
                if counter.get() == 0 {
                    ctx.lifetime(Lifetime::Attached, |_comp, _arg| Ok(()))?;
                }
                counter.set(counter.get() + 1);
                Ok(InitExports::none())
            })
            .register()
            .unwrap();

        let first = reg.instantiate(&comp).unwrap();
        let second = reg.instantiate(&comp).unwrap();
        assert_eq!(made.get(), 2);
        assert_eq!(first.lifetime_handler_count(Lifetime::Attached), 2);
        assert_eq!(second.lifetime_handler_count(Lifetime::Attached), 1);
        assert_eq!(comp.definition().lifetime_handler_count(Lifetime::Attached), 1);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn init_observer_needs_declared_key() {
        let reg = Registry::new();
        let log = log();
        let sink = Rc::clone(&log);
        let declared = reg
            .component()
            .static_data(json!({ "a": 0, "b": 0 }))
            .observer(["a", "b"], watch_tag(&log, "builder"))
            .init(move |ctx: &mut InitContext<'_>| {
                let sink = Rc::clone(&sink);
                ctx.observer("a, b", move |_comp, _values| {
                    sink.borrow_mut().push("init");
                    Ok(())
                })?;
                Ok(InitExports::none())
            })
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&declared).unwrap();
        inst.set_data(json!({ "b": 1 })).unwrap();
        assert_eq!(take(&log), ["builder", "init"]);

        let misspelled = reg
            .component()
            .static_data(json!({ "a": 0, "b": 0 }))
            .observer(["a", "b"], watch_tag(&log, "builder"))
            .init(|ctx: &mut InitContext<'_>| {
                ctx.observer("a,b", |_comp, _values| Ok(()))?;
                Ok(InitExports::none())
            })
            .register()
            .unwrap();
        let err = reg.instantiate(&misspelled).unwrap_err();
        assert!(matches!(err, ComposeError::UndeclaredObserver { ref key } if key == "a,b"));
    }

    #[test]
    fn everything_key_is_always_declared() {
        let reg = Registry::new();
        let log = log();
        let sink = Rc::clone(&log);
        let comp = reg
            .component()
            .static_data(json!({ "a": 0 }))
            .init(move |ctx: &mut InitContext<'_>| {
                let sink = Rc::clone(&sink);
                ctx.observer("**", move |_comp, _values| {
                    sink.borrow_mut().push("any");
                    Ok(())
                })?;
                Ok(InitExports::none())
            })
            .register()
            .unwrap();
        assert!(comp.definition().declares_observer("**"));
        let mut inst = reg.instantiate(&comp).unwrap();
        assert_eq!(inst.observer_handler_count("**"), Some(1));
        inst.set_data(json!({ "a": 1 })).unwrap();
        assert_eq!(take(&log), ["any"]);
    }

    #[test]
    fn registration_after_live_is_rejected() {
        let reg = Registry::new();
        let name = reg.trait_behavior::<u8>();
        let comp = reg.component().register().unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        let err = inst.lifetime(Lifetime::Attached, |_comp, _arg| Ok(())).unwrap_err();
        assert!(matches!(err, ComposeError::ConstructionComplete { op: "lifetime" }));
        let err = inst.observer("**", |_comp, _values| Ok(())).unwrap_err();
        assert!(matches!(err, ComposeError::ConstructionComplete { op: "observer" }));
        let err = inst.implement(&name, 1).unwrap_err();
        assert!(matches!(err, ComposeError::ConstructionComplete { op: "implement" }));
        let err = inst.page_lifetime(PageLifetime::Show, |_comp, _arg| Ok(())).unwrap_err();
        assert!(matches!(err, ComposeError::ConstructionComplete { op: "page_lifetime" }));
    }

    #[test]
    fn destroy_detaches_then_rejects_dispatch() {
        let reg = Registry::new();
        let log = log();
        let comp = reg
            .component()
            .lifetime(Lifetime::Detached, hook_tag(&log, "detached"))
            .register()
            .unwrap();

        let mut attached = reg.instantiate(&comp).unwrap();
        attached.attached().unwrap();
        assert!(attached.is_attached());
        attached.destroy().unwrap();
        assert_eq!(take(&log), ["detached"]);
        assert_eq!(attached.phase(), Phase::Destroyed);
        assert!(matches!(attached.attached(), Err(ComposeError::Destroyed { .. })));
        assert!(matches!(attached.set_data(json!({})), Err(ComposeError::Destroyed { .. })));

        let mut never_attached = reg.instantiate(&comp).unwrap();
        let report = never_attached.destroy().unwrap();
        assert_eq!(report.invoked, 0);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn created_fault_is_reported_to_host() {
        let reg = Registry::new();
        let log = log();
        let comp = reg
            .component()
            .lifetime(Lifetime::Created, |_comp, _arg| bail!("boom"))
            .lifetime(Lifetime::Created, hook_tag(&log, "sibling"))
            .register()
            .unwrap();
        let inst = reg.instantiate(&comp).unwrap();

        assert_eq!(take(&log), ["sibling"]);
        assert!(inst.is_live());
        let report = inst.created_report();
        assert_eq!(report.invoked, 2);
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].index, 0);
        assert_eq!(report.faults[0].message, "boom");
    }

    #[test]
    fn created_fires_only_during_instantiation() {
        let reg = Registry::new();
        let log = log();
        let comp = reg
            .component()
            .lifetime(Lifetime::Created, hook_tag(&log, "created"))
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();
        assert_eq!(take(&log), ["created"]);
        assert!(inst.created_report().is_ok());

        let err = inst.trigger_lifetime(Lifetime::Created, &Value::Null).unwrap_err();
        assert!(matches!(err, ComposeError::CreatedFired { .. }));
        assert!(take(&log).is_empty());
        assert_eq!(inst.trigger_lifetime(Lifetime::Moved, &Value::Null).unwrap().invoked, 0);
    }

    #[test]
    fn page_lifetimes_receive_their_argument() {
        let reg = Registry::new();
        let log = log();
        let comp = reg
            .component()
            .static_data(json!({ "width": 0 }))
            .page_lifetime(PageLifetime::Show, hook_tag(&log, "show"))
            .page_lifetime(PageLifetime::Resize, |comp, size: &Value| {
                comp.set_data(json!({ "width": size["width"].clone() }))?;
                Ok(())
            })
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        inst.show().unwrap();
        let report = inst.hide().unwrap();
        assert_eq!(report.invoked, 0);
        inst.resize(json!({ "width": 320, "height": 480 })).unwrap();
        assert_eq!(take(&log), ["show"]);
        assert_eq!(inst.data()["width"], 320);
    }
}

#[cfg(test)]
mod methods {
    use std::rc::Rc;

    use anyhow::bail;
    use ch_core::TaggedMethod;
    use serde_json::json;

    use super::support::{log, take};
    use crate::{ComposeError, InitContext, InitExports, Registry, method};

    #[test]
    fn declared_methods_are_callable() {
        let reg = Registry::new();
        let comp = reg
            .component()
            .static_data(json!({ "count": 0 }))
            .methods([(
                "add",
                method(|comp, detail| {
                    let n = comp.data()["count"].as_i64().unwrap_or_default();
                    let by = detail.as_i64().unwrap_or(1);
                    comp.set_data(json!({ "count": n + by }))?;
                    Ok(())
                }),
            )])
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        inst.call_method("add", &json!(5)).unwrap();
        assert_eq!(inst.data()["count"], 5);
        let err = inst.call_method("sub", &json!(1)).unwrap_err();
        assert!(matches!(err, ComposeError::UnknownMethod { ref name } if name == "sub"));
    }

    #[test]
    fn only_tagged_init_exports_become_methods() {
        let reg = Registry::new();
        let log = log();
        let sink = Rc::clone(&log);
        let comp = reg
            .component()
            .init(move |ctx: &mut InitContext<'_>| {
                let on_tap = Rc::clone(&sink);
                Ok(InitExports::none()
                    .with("reset", ctx.method(|_comp, _detail| Ok(())))
                    .with(
                        "onTap",
                        ctx.listener(move |_comp, _detail| {
                            on_tap.borrow_mut().push("tap");
                            Ok(())
                        }),
                    )
                    .with("helper", TaggedMethod::untagged(method(|_comp, _detail| Ok(()))))
                    .with("answer", json!(42)))
            })
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        assert_eq!(inst.method_names().collect::<Vec<_>>(), ["reset", "onTap"]);
        inst.call_method("onTap", &json!(null)).unwrap();
        assert_eq!(take(&log), ["tap"]);
    }

    #[test]
    fn method_fault_is_reported() {
        let reg = Registry::new();
        let comp = reg
            .component()
            .methods([("fail", method(|_comp, _detail| bail!("nope")))])
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();
        let report = inst.call_method("fail", &json!(null)).unwrap();
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].message, "nope");
    }

    #[test]
    fn later_methods_overwrite_by_name() {
        let reg = Registry::new();
        let base = reg
            .behavior()
            .methods([("greet", method(|_comp, _detail| bail!("base")))])
            .register()
            .unwrap();
        let comp = reg
            .component()
            .behavior(&base)
            .methods([("greet", method(|_comp, _detail| Ok(())))])
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();
        assert!(inst.call_method("greet", &json!(null)).unwrap().is_ok());
    }
}

#[cfg(test)]
mod export {
    use serde_json::{Value, json};

    use crate::Registry;

    #[test]
    fn last_export_wins() {
        let reg = Registry::new();
        let base = reg.behavior().export(|_comp| 1u32).register().unwrap();
        let comp = reg.component().behavior(&base).export(|_comp| 2u32).register().unwrap();
        assert!(comp.definition().has_export());
        let inst = reg.instantiate(&comp).unwrap();
        assert_eq!(inst.select_export_as::<u32>(), Some(2));
    }

    #[test]
    fn export_reads_instance_data() {
        let reg = Registry::new();
        let comp = reg
            .component()
            .static_data(json!({ "childField": "abc" }))
            .export(|comp| comp.data()["childField"].clone())
            .register()
            .unwrap();
        let inst = reg.instantiate(&comp).unwrap();
        assert_eq!(inst.select_export_as::<Value>(), Some(json!("abc")));
        assert!(inst.select_export_as::<u32>().is_none());
    }

    #[test]
    fn destroyed_instance_selects_nothing() {
        let reg = Registry::new();
        let comp = reg.component().export(|_comp| 1u32).register().unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();
        assert_eq!(inst.select_export_as::<u32>(), Some(1));
        inst.destroy().unwrap();
        assert!(inst.select_export().is_none());
        assert!(inst.select_export_as::<u32>().is_none());
    }

    #[test]
    fn no_export_selects_nothing() {
        let reg = Registry::new();
        let comp = reg.component().register().unwrap();
        assert!(!comp.definition().has_export());
        let inst = reg.instantiate(&comp).unwrap();
        assert!(inst.select_export().is_none());
    }
}

#[cfg(test)]
mod classic {
    use std::rc::Rc;

    use ch_core::{CoreError, Lifetime};
    use indexmap::IndexMap;
    use serde_json::json;

    use super::support::{hook_tag, log, take};
    use crate::{
        BuildError, ClassicDefinition, ComponentOptions, PropertyType, Registry, method,
        observer_fn,
    };

    #[test]
    fn behaviors_and_data_merge_like_chains() {
        let reg = Registry::new();
        let beh = reg
            .behavior()
            .definition(ClassicDefinition {
                data: Some(json!({ "text2": "abc" })),
                lifetimes: IndexMap::from([(
                    "attached".to_owned(),
                    method(|comp, _arg| {
                        comp.set_data(json!({ "text": "def", "text2": "def" }))?;
                        Ok(())
                    }),
                )]),
                ..ClassicDefinition::default()
            })
            .register()
            .unwrap();
        let beh2 = reg
            .behavior()
            .definition(ClassicDefinition { behaviors: vec![beh], ..ClassicDefinition::default() })
            .register()
            .unwrap();
        let comp = reg
            .component()
            .definition(ClassicDefinition {
                behaviors: vec![beh2],
                data: Some(json!({ "text": "abc" })),
                lifetimes: IndexMap::from([(
                    "attached".to_owned(),
                    method(|comp, _arg| {
                        comp.set_data(json!({ "text": "ghi" }))?;
                        Ok(())
                    }),
                )]),
                ..ClassicDefinition::default()
            })
            .register()
            .unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();
        inst.attached().unwrap();
        assert_eq!(inst.data()["text"], "ghi");
        assert_eq!(inst.data()["text2"], "def");
    }

    #[test]
    fn lifetimes_table_overrides_shorthand() {
        let reg = Registry::new();
        let log = log();
        let comp = reg
            .component()
            .definition(ClassicDefinition {
                created: Some(Rc::new(hook_tag(&log, "created"))),
                attached: Some(Rc::new(hook_tag(&log, "shorthand"))),
                lifetimes: IndexMap::from([(
                    "attached".to_owned(),
                    method(hook_tag(&log, "table")),
                )]),
                ..ClassicDefinition::default()
            })
            .register()
            .unwrap();
        assert_eq!(comp.definition().lifetime_handler_count(Lifetime::Attached), 1);

        let mut inst = reg.instantiate(&comp).unwrap();
        inst.attached().unwrap();
        assert_eq!(take(&log), ["created", "table"]);
    }

    #[test]
    fn observers_properties_and_classes() {
        let reg = Registry::new();
        let log = log();
        let sink = Rc::clone(&log);
        let comp = reg
            .component()
            .definition(ClassicDefinition {
                properties: IndexMap::from([("propA".to_owned(), PropertyType::String.into())]),
                observers: IndexMap::from([(
                    "propA".to_owned(),
                    observer_fn(move |_comp, _values| {
                        sink.borrow_mut().push("propA");
                        Ok(())
                    }),
                )]),
                external_classes: vec!["external".to_owned()],
                ..ClassicDefinition::default()
            })
            .external_classes(["second"])
            .register()
            .unwrap();
        assert_eq!(comp.definition().external_classes(), ["external", "second"]);

        let mut inst = reg.instantiate(&comp).unwrap();
        inst.set_property("propA", json!("v")).unwrap();
        assert_eq!(take(&log), ["propA"]);
    }

    #[test]
    fn unknown_lifetime_name_fails() {
        let reg = Registry::new();
        let err = reg
            .component()
            .definition(ClassicDefinition {
                lifetimes: IndexMap::from([("mounted".to_owned(), method(|_comp, _arg| Ok(())))]),
                ..ClassicDefinition::default()
            })
            .register()
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::Core(CoreError::UnknownLifetime(ref n)) if n == "mounted"));
    }

    #[test]
    fn options_apply_to_components_only() {
        let reg = Registry::new();
        let options = ComponentOptions { multiple_slots: true, virtual_host: true, ..Default::default() };

        let comp = reg
            .component()
            .definition(ClassicDefinition { options: Some(options.clone()), ..Default::default() })
            .register()
            .unwrap();
        assert_eq!(*comp.definition().options(), options);

        let beh = reg
            .behavior()
            .definition(ClassicDefinition { options: Some(options), ..Default::default() })
            .register()
            .unwrap();
        assert_eq!(*beh.definition().options(), ComponentOptions::default());
    }

    #[test]
    fn non_object_data_fails() {
        let reg = Registry::new();
        let err = reg
            .behavior()
            .definition(ClassicDefinition { data: Some(json!("text")), ..Default::default() })
            .register()
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::StaticDataNotObject { found: "string" }));
    }
}

#[cfg(test)]
mod relations {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ch_core::InstanceId;

    use crate::{ComposeError, RelationDescriptor, RelationEvent, RelationKind, Registry};

    #[test]
    fn events_reach_their_handlers() {
        let reg = Registry::new();
        let peers: Rc<RefCell<Vec<InstanceId>>> = Rc::default();
        let sink = Rc::clone(&peers);
        let comp = reg
            .component()
            .relation(
                "item",
                RelationDescriptor::new(RelationKind::Child)
                    .with_target("list-item")
                    .on_linked(move |_comp, peer| {
                        sink.borrow_mut().push(peer);
                        Ok(())
                    }),
            )
            .register()
            .unwrap();
        let relation = comp.definition().relation("item").unwrap();
        assert_eq!(relation.kind(), RelationKind::Child);
        assert_eq!(relation.target(), Some("list-item"));

        let mut inst = reg.instantiate(&comp).unwrap();
        let report = inst.relation_event("item", RelationEvent::Linked, InstanceId(9)).unwrap();
        assert_eq!(report.invoked, 1);
        assert_eq!(*peers.borrow(), [InstanceId(9)]);

        let report = inst.relation_event("item", RelationEvent::Unlinked, InstanceId(9)).unwrap();
        assert_eq!(report.invoked, 0);

        let err = inst.relation_event("other", RelationEvent::Linked, InstanceId(1)).unwrap_err();
        assert!(matches!(err, ComposeError::UnknownRelation { .. }));
    }
}

#[cfg(test)]
mod registry {
    use ch_core::{ComposeConfig, CoreError};
    use serde_json::json;

    use crate::{ComponentOptions, DefinitionKind, Registry};

    #[derive(Debug, PartialEq)]
    struct Seen(u32);

    #[test]
    fn zero_depth_config_is_rejected() {
        let config = ComposeConfig { max_path_depth: 0, ..ComposeConfig::default() };
        assert!(matches!(Registry::with_config(config), Err(CoreError::Config(_))));
    }

    #[test]
    fn definitions_are_stored_and_looked_up() {
        let reg = Registry::new();
        assert!(reg.is_empty());
        let beh = reg.behavior().register().unwrap();
        let comp = reg.component().behavior(&beh).register().unwrap();
        assert_eq!(reg.len(), 2);
        assert_ne!(beh.definition().id(), comp.definition().id());
        let found = reg.lookup(comp.definition().id()).unwrap();
        assert_eq!(found.kind(), DefinitionKind::Component);
        assert_eq!(beh.definition().kind(), DefinitionKind::Behavior);
    }

    #[test]
    fn last_options_call_wins() {
        let reg = Registry::new();
        let comp = reg
            .component()
            .options(ComponentOptions { multiple_slots: true, ..Default::default() })
            .options(ComponentOptions {
                pure_data_pattern: Some("^_".to_owned()),
                ..Default::default()
            })
            .register()
            .unwrap();
        let options = comp.definition().options();
        assert!(!options.multiple_slots);
        assert_eq!(options.pure_data_pattern.as_deref(), Some("^_"));
    }

    #[test]
    fn extras_are_typed_per_instance() {
        let reg = Registry::new();
        let comp = reg.component().static_data(json!({})).register().unwrap();
        let mut inst = reg.instantiate(&comp).unwrap();

        assert!(inst.insert_extra(Seen(1)).is_none());
        inst.extra_mut::<Seen>().unwrap().0 += 1;
        assert_eq!(inst.extra::<Seen>(), Some(&Seen(2)));
        assert_eq!(inst.insert_extra(Seen(5)), Some(Seen(2)));
        assert_eq!(inst.remove_extra::<Seen>(), Some(Seen(5)));
        assert!(inst.extra::<String>().is_none());
    }
}
