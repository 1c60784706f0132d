//! Phase 2: slice expansion.
//!
//! Replaces every connection whose source or destination spans more than
//! one bit with a sequence of single-bit connections. After this phase, no
//! [`IndexSpec::Slice`](shdl_ast::IndexSpec::Slice) and no bare
//! multi-bit reference remains anywhere in a connect-block.

use shdl_ast::{BodyItem, Component, Connection, IndexSpec, Instance, SignalRef};
use shdl_common::Interner;
use shdl_diagnostics::DiagnosticSink;
use shdl_library::ResolvedLibrary;
use shdl_source::Span;

use crate::env::index_to_range;
use crate::errors;

/// Resolves the bit width of a signal reference: a component port if
/// `r.instance` is `None`, otherwise the named pin's width on the
/// referenced instance's kind (always 1 for primitive pins).
fn resolve_width(
    r: &SignalRef,
    component: &Component,
    decls: &[BodyItem],
    library: &ResolvedLibrary,
    interner: &Interner,
) -> Option<u32> {
    let port_name_str = r.name.as_literal()?;
    match &r.instance {
        None => {
            let port_ident = interner.get_or_intern(port_name_str);
            if let Some(p) = component.port(port_ident) {
                return Some(p.bit_count());
            }
            // Not a port: may be a reference to a not-yet-materialized constant.
            decls.iter().find_map(|item| match item {
                BodyItem::Constant(c) if c.name.as_literal() == Some(port_name_str) => {
                    Some(c.effective_width())
                }
                _ => None,
            })
        }
        Some(inst_name) => {
            let inst_name_str = inst_name.as_literal()?;
            let kind_name = decls.iter().find_map(|item| match item {
                BodyItem::Instance(Instance { name, kind, .. }) => {
                    if name.as_literal() == Some(inst_name_str) {
                        kind.as_literal()
                    } else {
                        None
                    }
                }
                _ => None,
            })?;
            if let Some(_prim) = shdl_ast::PrimitiveKind::from_name(kind_name) {
                Some(1)
            } else {
                let kind_ident = interner.get_or_intern(kind_name);
                let port_ident = interner.get_or_intern(port_name_str);
                library.component(kind_ident)?.port(port_ident).map(|p| p.bit_count())
            }
        }
    }
}

/// Expands all connections in `connections` to single-bit form.
pub fn expand(
    connections: &[BodyItem],
    component: &Component,
    decls: &[BodyItem],
    library: &ResolvedLibrary,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Vec<BodyItem> {
    let mut out = Vec::new();
    for item in connections {
        match item {
            BodyItem::Connection(c) => {
                out.extend(expand_connection(c, component, decls, library, interner, sink));
            }
            // Generators are eliminated in phase 1; constants pass through untouched here.
            other => out.push(other.clone()),
        }
    }
    out
}

fn expand_connection(
    c: &Connection,
    component: &Component,
    decls: &[BodyItem],
    library: &ResolvedLibrary,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Vec<BodyItem> {
    let Some(src_width) = resolve_width(&c.source, component, decls, library, interner) else {
        return Vec::new();
    };
    let Some(dst_width) = resolve_width(&c.destination, component, decls, library, interner) else {
        return Vec::new();
    };

    let (src_lo, src_hi) = index_to_range(&c.source.index, src_width, c.span);
    let (dst_lo, dst_hi) = index_to_range(&c.destination.index, dst_width, c.span);

    if !in_bounds(src_lo, src_hi, src_width) {
        sink.emit(errors::error_slice_out_of_range(
            c.source.name.as_literal().unwrap_or(""),
            out_of_range_value(src_lo, src_hi, src_width),
            src_width,
            c.source.span,
        ));
        return Vec::new();
    }
    if !in_bounds(dst_lo, dst_hi, dst_width) {
        sink.emit(errors::error_slice_out_of_range(
            c.destination.name.as_literal().unwrap_or(""),
            out_of_range_value(dst_lo, dst_hi, dst_width),
            dst_width,
            c.destination.span,
        ));
        return Vec::new();
    }

    let src_count = src_hi - src_lo + 1;
    let dst_count = dst_hi - dst_lo + 1;
    if src_count != dst_count {
        sink.emit(errors::error_width_mismatch(
            src_count.max(0) as u32,
            dst_count.max(0) as u32,
            c.span,
        ));
        return Vec::new();
    }

    let mut out = Vec::with_capacity(src_count.max(0) as usize);
    for i in 0..src_count {
        let source = single_bit_ref(&c.source, src_lo + i, c.span);
        let destination = single_bit_ref(&c.destination, dst_lo + i, c.span);
        out.push(BodyItem::Connection(Connection {
            source,
            destination,
            span: c.span,
        }));
    }
    out
}

fn single_bit_ref(r: &SignalRef, bit: i64, span: Span) -> SignalRef {
    SignalRef {
        instance: r.instance.clone(),
        name: r.name.clone(),
        index: IndexSpec::Single(shdl_ast::ArithExpr::Number(bit)),
        span,
    }
}

fn in_bounds(lo: i64, hi: i64, width: u32) -> bool {
    lo >= 1 && hi <= width as i64 && lo <= hi
}

fn out_of_range_value(lo: i64, hi: i64, width: u32) -> i64 {
    if lo < 1 {
        lo
    } else {
        hi.max(width as i64 + 1)
    }
}
