//! Symbol tables over a flattened netlist: name uniqueness for gates and
//! ports, checked independently of whatever produced the netlist.

use std::collections::HashMap;

use shdl_common::Interner;
use shdl_diagnostics::DiagnosticSink;
use shdl_ir::Netlist;

use crate::errors;

/// Checks that no two gates share a name and no two ports (input or
/// output) share a name, emitting [`errors::error_duplicate_name`] for
/// each collision found.
///
/// The flattener's own naming scheme (instance-path prefixing) already
/// makes collisions unreachable for netlists it produces, but the
/// analyzer is a boundary: it must not assume its input came from any
/// particular flattener.
pub fn check_unique_names(netlist: &Netlist, interner: &Interner, sink: &DiagnosticSink) {
    let mut seen = HashMap::new();
    for (_, gate) in netlist.gates.iter() {
        let name = interner.resolve(gate.name);
        if let Some(&prev) = seen.get(name) {
            sink.emit(errors::error_duplicate_name(name, gate.span, prev));
        } else {
            seen.insert(name, gate.span);
        }
    }

    let mut seen_ports = HashMap::new();
    for port in netlist.all_ports() {
        let name = interner.resolve(port.name);
        if let Some(&prev) = seen_ports.get(name) {
            sink.emit(errors::error_duplicate_name(name, port.span, prev));
        } else {
            seen_ports.insert(name, port.span);
        }
    }
}
