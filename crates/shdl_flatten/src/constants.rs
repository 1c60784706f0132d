//! Phase 3: constant materialization.
//!
//! Replaces every declared constant with one `VCC`/`GND` gate instance per
//! bit, and rewrites every connect-block reference to that constant into a
//! reference to the corresponding instance's `O` pin.

use std::collections::HashMap;

use shdl_ast::{ArithExpr, BodyItem, Connection, IndexSpec, Instance, SignalRef, TemplatedName};
use shdl_source::Span;

/// Materializes constants out of `decls`, returning the updated
/// declaration list (with `Constant` items replaced by `Instance` items)
/// and a rewrite table from `(constant literal name, bit)` to the
/// materialized instance's literal name.
fn materialize(decls: &[BodyItem]) -> (Vec<BodyItem>, HashMap<(String, i64), String>) {
    let mut out = Vec::with_capacity(decls.len());
    let mut rewrite = HashMap::new();

    for item in decls {
        match item {
            BodyItem::Constant(c) => {
                let name = c.name.as_literal().expect("literal after generator expansion").to_string();
                let width = c.effective_width();
                for bit in 1..=width {
                    let instance_name = format!("{name}_bit{bit}");
                    let kind = if c.bit(bit) { "__VCC__" } else { "__GND__" };
                    out.push(BodyItem::Instance(Instance {
                        name: TemplatedName::literal(instance_name.clone()),
                        kind: TemplatedName::literal(kind),
                        span: c.span,
                    }));
                    rewrite.insert((name.clone(), bit as i64), instance_name);
                }
            }
            other => out.push(other.clone()),
        }
    }

    (out, rewrite)
}

/// Rewrites every connect-block reference to a materialized constant into
/// a reference to its instance's `O` pin.
fn rewrite_connections(
    connections: &[BodyItem],
    rewrite: &HashMap<(String, i64), String>,
) -> Vec<BodyItem> {
    connections
        .iter()
        .map(|item| match item {
            BodyItem::Connection(c) => BodyItem::Connection(Connection {
                source: rewrite_ref(&c.source, rewrite),
                destination: rewrite_ref(&c.destination, rewrite),
                span: c.span,
            }),
            other => other.clone(),
        })
        .collect()
}

fn rewrite_ref(r: &SignalRef, rewrite: &HashMap<(String, i64), String>) -> SignalRef {
    if r.instance.is_some() {
        return r.clone();
    }
    let Some(name) = r.name.as_literal() else {
        return r.clone();
    };
    let bit = match &r.index {
        IndexSpec::Single(ArithExpr::Number(n)) => *n,
        IndexSpec::None => 1,
        _ => return r.clone(),
    };
    match rewrite.get(&(name.to_string(), bit)) {
        Some(instance_name) => SignalRef {
            instance: Some(TemplatedName::literal(instance_name.clone())),
            name: TemplatedName::literal("O"),
            index: IndexSpec::None,
            span: r.span,
        },
        None => r.clone(),
    }
}

/// Applies constant materialization to a component's already
/// generator-expanded and slice-expanded declaration and connect lists.
pub fn expand(decls: &[BodyItem], connect: &[BodyItem]) -> (Vec<BodyItem>, Vec<BodyItem>) {
    let (new_decls, rewrite) = materialize(decls);
    let new_connect = rewrite_connections(connect, &rewrite);
    (new_decls, new_connect)
}
