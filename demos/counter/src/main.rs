//! counter — smallest end-to-end composition example.
//!
//! Two behaviors are composed into one component:
//!
//! * `bounded` declares a `max` property and a `Clamp` capability.
//! * `stepping` keeps a `count`, implements `Clamp`, and exports an
//!   `increment` method from its init function.
//!
//! The component adds its own observer and lifetimes, then the host side of
//! this binary instantiates it and plays through attach → taps → resize →
//! destroy.  Run with `RUST_LOG=debug` (or `trace`) to see the engine's own
//! log lines.

use std::rc::Rc;

use anyhow::Result;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

use ch_component::{
    Component, InitContext, InitExports, PropertyDef, PropertyType, Registry, method,
};
use ch_core::Lifetime;

// ── Constants ─────────────────────────────────────────────────────────────────

const MAX_COUNT: i64   = 3;
const TAPS:      usize = 5;

/// Clamp a candidate count to the component's bounds.
type Clamp = Rc<dyn Fn(i64, &Value) -> i64>;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = Registry::new();
    let clamp = registry.trait_behavior::<Clamp>();

    // ── Behaviors ─────────────────────────────────────────────────────────

    let bounded = registry
        .behavior()
        .property("max", PropertyDef::new(PropertyType::Number).with_value(json!(MAX_COUNT)))
        .register()?;

    let clamp_impl = clamp.clone();
    let stepping = registry
        .behavior()
        .behavior(&bounded)
        .static_data(json!({ "count": 0, "history": [] }))
        .init(move |ctx: &mut InitContext<'_>| {
            let limit: Clamp = Rc::new(|n: i64, data: &Value| -> i64 {
                n.min(data["max"].as_i64().unwrap_or(i64::MAX))
            });
            ctx.implement(&clamp_impl, limit)?;

            let clamp = clamp_impl.clone();
            let increment = ctx.method(move |comp: &mut Component, _detail| {
                let next = comp.data()["count"].as_i64().unwrap_or_default() + 1;
                let next = match comp.trait_behavior(&clamp) {
                    Some(limit) => limit(next, comp.data()),
                    None => next,
                };
                comp.set_data(json!({ "count": next }))?;
                Ok(())
            });
            Ok(InitExports::none().with("increment", increment))
        })
        .register()?;

    // ── Component ─────────────────────────────────────────────────────────

    let counter = registry
        .component()
        .behavior(&stepping)
        .observer("count", |comp, values| {
            let len = comp.data()["history"].as_array().map_or(0, Vec::len);
            let mut update = Map::new();
            update.insert(format!("history[{len}]"), values[0].clone());
            comp.set_data(Value::Object(update))?;
            Ok(())
        })
        .lifetime(Lifetime::Attached, |comp, _arg| {
            tracing::info!(instance = %comp.id(), "counter attached");
            Ok(())
        })
        .lifetime(Lifetime::Detached, |comp, _arg| {
            tracing::info!(instance = %comp.id(), count = %comp.data()["count"], "counter detached");
            Ok(())
        })
        .methods([(
            "reset",
            method(|comp, _detail| {
                comp.set_data(json!({ "count": 0 }))?;
                Ok(())
            }),
        )])
        .register()?;

    // ── Host side ─────────────────────────────────────────────────────────

    let mut instance = registry.instantiate(&counter)?;
    instance.attached()?;

    for _ in 0..TAPS {
        let report = instance.call_method("increment", &Value::Null)?;
        if !report.is_ok() {
            tracing::warn!(faults = report.faults.len(), "increment reported faults");
        }
    }
    println!("after {TAPS} taps: count = {}", instance.data()["count"]);
    println!("history: {}", instance.data()["history"]);

    instance.call_method("reset", &Value::Null)?;
    instance.resize(json!({ "width": 375, "height": 667 }))?;
    let report = instance.destroy()?;

    println!(
        "final data: {}  (destroy ran {} handler(s))",
        instance.data(),
        report.invoked
    );
    Ok(())
}
