//! Unused-declaration warnings: an input port nothing reads, an output
//! port nothing drives, and a constant source (`VCC`/`GND`) nothing reads
//! back. All three are derived from the same connection list the driver
//! checks in [`crate::connections`] walk, just grouped by bit-level
//! presence rather than uniqueness.

use std::collections::HashSet;

use shdl_ast::PrimitiveKind;
use shdl_common::Interner;
use shdl_diagnostics::DiagnosticSink;
use shdl_ir::{Endpoint, GateId, Netlist, Pin};

use crate::errors;

/// Emits [`errors::warn_unused_port`], [`errors::warn_unconnected_output`],
/// and [`errors::warn_unused_constant`] for every declaration that
/// qualifies.
pub fn collect(netlist: &Netlist, interner: &Interner, sink: &DiagnosticSink) {
    let mut input_read: HashSet<(shdl_common::Ident, u32)> = HashSet::new();
    let mut output_driven: HashSet<(shdl_common::Ident, u32)> = HashSet::new();
    let mut gate_read: HashSet<GateId> = HashSet::new();

    for conn in &netlist.connections {
        match conn.source {
            Endpoint::Port { port, bit } => {
                input_read.insert((port, bit));
            }
            Endpoint::Gate { gate, pin: Pin::O } => {
                gate_read.insert(gate);
            }
            Endpoint::Gate { .. } => {}
        }
        if let Endpoint::Port { port, bit } = conn.destination {
            output_driven.insert((port, bit));
        }
    }

    for port in &netlist.inputs {
        let any_bit_read = (1..=port.bit_count()).any(|bit| input_read.contains(&(port.name, bit)));
        if !any_bit_read {
            sink.emit(errors::warn_unused_port(interner.resolve(port.name), port.span));
        }
    }

    for port in &netlist.outputs {
        let any_bit_driven = (1..=port.bit_count()).any(|bit| output_driven.contains(&(port.name, bit)));
        if !any_bit_driven {
            sink.emit(errors::warn_unconnected_output(interner.resolve(port.name), port.span));
        }
    }

    for (gate_id, gate) in netlist.gates.iter() {
        if matches!(gate.kind, PrimitiveKind::Vcc | PrimitiveKind::Gnd) && !gate_read.contains(&gate_id) {
            sink.emit(errors::warn_unused_constant(interner.resolve(gate.name), gate.span));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shdl_ir::{Arena, Connection, Gate};
    use shdl_source::Span;

    #[test]
    fn unread_input_port_warns() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let a = interner.get_or_intern("A");
        let netlist = Netlist {
            name: interner.get_or_intern("T"),
            inputs: vec![shdl_ast::Port { name: a, width: None, span: Span::DUMMY }],
            outputs: vec![],
            gates: Arena::new(),
            connections: vec![],
            span: Span::DUMMY,
        };
        collect(&netlist, &interner, &sink);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn read_input_port_is_silent() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let a = interner.get_or_intern("A");
        let o = interner.get_or_intern("O");
        let netlist = Netlist {
            name: interner.get_or_intern("T"),
            inputs: vec![shdl_ast::Port { name: a, width: None, span: Span::DUMMY }],
            outputs: vec![shdl_ast::Port { name: o, width: None, span: Span::DUMMY }],
            gates: Arena::new(),
            connections: vec![Connection {
                source: Endpoint::Port { port: a, bit: 1 },
                destination: Endpoint::Port { port: o, bit: 1 },
                span: Span::DUMMY,
            }],
            span: Span::DUMMY,
        };
        collect(&netlist, &interner, &sink);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn unread_constant_gate_warns() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let mut gates = Arena::new();
        gates.alloc(Gate {
            name: interner.get_or_intern("Hundred_bit1"),
            kind: PrimitiveKind::Gnd,
            span: Span::DUMMY,
        });
        let netlist = Netlist {
            name: interner.get_or_intern("T"),
            inputs: vec![],
            outputs: vec![],
            gates,
            connections: vec![],
            span: Span::DUMMY,
        };
        collect(&netlist, &interner, &sink);
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
