//! The Flattener: turns a resolved Expanded-form component library into a
//! [`Design`](shdl_ir::Design) of flat, Base-form [`Netlist`](shdl_ir::Netlist)s.
//!
//! Four phases run in strict order on each component, outermost instance
//! first: generator expansion ([`generators`]), slice expansion
//! ([`slices`]), constant materialization ([`constants`]), and hierarchy
//! inlining ([`inline`]), which recursively flattens and splices in every
//! instantiated user component. [`env`] holds the generator substitution
//! environment shared by the first phase; [`errors`] holds this crate's
//! diagnostic codes.

#![warn(missing_docs)]

pub mod constants;
pub mod env;
pub mod errors;
pub mod generators;
pub mod inline;
pub mod slices;

use shdl_common::{Ident, Interner};
use shdl_diagnostics::DiagnosticSink;
use shdl_ir::Design;
use shdl_library::ResolvedLibrary;

pub use inline::{flatten, FlattenCache};

/// Flattens every user component in `library` into a [`Design`].
///
/// Components are flattened independently, but [`FlattenCache`] is shared
/// across all of them so a component instantiated by more than one other
/// component is only processed once. A component that fails to flatten
/// (an unknown reference or an instantiation cycle, already reported to
/// `sink`) is simply omitted from the result.
pub fn flatten_library(library: &ResolvedLibrary, interner: &Interner, sink: &DiagnosticSink) -> Design {
    let mut cache = FlattenCache::new();
    let mut netlists = Vec::new();
    for name in library.component_names() {
        if let Some(netlist) = flatten(name, library, interner, sink, &mut cache) {
            netlists.push(netlist);
        }
    }
    Design { netlists }
}

/// Flattens a single named component (and everything it transitively
/// instantiates) into one [`Netlist`](shdl_ir::Netlist).
pub fn flatten_component(
    name: Ident,
    library: &ResolvedLibrary,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Option<shdl_ir::Netlist> {
    let mut cache = FlattenCache::new();
    flatten(name, library, interner, sink, &mut cache)
}
