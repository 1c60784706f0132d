//! Phase 1: generator expansion.
//!
//! Walks a declaration or connect-block list, deep-copying each
//! `Generator` body once per value in its range with the substitution
//! environment extended, until no `Generator` items remain.

use std::collections::HashSet;

use shdl_ast::{BodyItem, Connection, Constant, Instance, SignalRef};
use shdl_common::{Ident, Interner};
use shdl_diagnostics::DiagnosticSink;

use crate::env::{eval_range, substitute_index, substitute_name, Env};
use crate::errors;

/// Expands every [`Generator`](shdl_ast::Generator) out of `items`,
/// returning a flat list containing only `Instance`/`Constant`/`Connection`
/// items with fully-literal names.
///
/// `bound_vars` tracks generator variables already bound by an enclosing
/// generator, to detect shadowing.
pub fn expand(
    items: &[BodyItem],
    env: &Env,
    bound_vars: &HashSet<Ident>,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Vec<BodyItem> {
    let mut out = Vec::new();
    for item in items {
        match item {
            BodyItem::Instance(inst) => {
                if let Some(expanded) = expand_instance(inst, env, interner, sink) {
                    out.push(BodyItem::Instance(expanded));
                }
            }
            BodyItem::Constant(c) => {
                if let Some(expanded) = expand_constant(c, env, interner, sink) {
                    out.push(BodyItem::Constant(expanded));
                }
            }
            BodyItem::Connection(c) => {
                if let Some(expanded) = expand_connection(c, env, interner, sink) {
                    out.push(BodyItem::Connection(expanded));
                }
            }
            BodyItem::Generator(g) => {
                if bound_vars.contains(&g.var) {
                    sink.emit(errors::error_shadowing_generator(interner.resolve(g.var), g.span));
                    continue;
                }
                let Some((lo, hi)) = eval_range(&g.range, env, sink) else {
                    continue;
                };
                if lo > hi {
                    sink.emit(errors::error_empty_generator_range(g.span));
                    continue;
                }
                let mut inner_bound = bound_vars.clone();
                inner_bound.insert(g.var);
                for v in lo..=hi {
                    let inner_env = env.bind(g.var, v);
                    out.extend(expand(&g.body, &inner_env, &inner_bound, interner, sink));
                }
            }
        }
    }
    check_duplicate_instances(&out, interner, sink);
    out
}

fn expand_instance(
    inst: &Instance,
    env: &Env,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Option<Instance> {
    let name = substitute_name(&inst.name, env, sink)?;
    let kind = substitute_name(&inst.kind, env, sink)?;
    Some(Instance {
        name: shdl_ast::TemplatedName::literal(name),
        kind: shdl_ast::TemplatedName::literal(kind),
        span: inst.span,
    })
}

fn expand_constant(
    c: &Constant,
    env: &Env,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Option<Constant> {
    let name = substitute_name(&c.name, env, sink)?;
    Some(Constant {
        name: shdl_ast::TemplatedName::literal(name),
        value: c.value,
        width: c.width,
        span: c.span,
    })
}

fn expand_connection(
    c: &Connection,
    env: &Env,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Option<Connection> {
    Some(Connection {
        source: expand_signal_ref(&c.source, env, interner, sink)?,
        destination: expand_signal_ref(&c.destination, env, interner, sink)?,
        span: c.span,
    })
}

fn expand_signal_ref(
    r: &SignalRef,
    env: &Env,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Option<SignalRef> {
    let instance = match &r.instance {
        Some(name) => Some(shdl_ast::TemplatedName::literal(substitute_name(
            name, env, sink,
        )?)),
        None => None,
    };
    let name = substitute_name(&r.name, env, sink)?;
    let index = substitute_index(&r.index, env, sink)?;
    Some(SignalRef {
        instance,
        name: shdl_ast::TemplatedName::literal(name),
        index,
        span: r.span,
    })
}

fn check_duplicate_instances(items: &[BodyItem], interner: &Interner, sink: &DiagnosticSink) {
    let mut seen: std::collections::HashMap<&str, shdl_source::Span> = std::collections::HashMap::new();
    for item in items {
        if let BodyItem::Instance(inst) = item {
            let name = inst.name.as_literal().expect("fully substituted by this point");
            if let Some(&prev) = seen.get(name) {
                sink.emit(errors::error_duplicate_instance(name, inst.span, prev));
            } else {
                seen.insert(name, inst.span);
            }
        }
    }
    let _ = interner;
}
