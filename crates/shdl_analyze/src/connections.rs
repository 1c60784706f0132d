//! Connection resolution and validation: every endpoint must name a real
//! port bit or gate pin in the role (source/destination) it was used in,
//! every destination bit must have exactly one driver, and every gate
//! input pin its kind requires must be driven by something.

use std::collections::HashMap;

use shdl_common::Interner;
use shdl_diagnostics::DiagnosticSink;
use shdl_ir::{Connection, Endpoint, Gate, Netlist, Pin};
use shdl_source::Span;

use crate::errors;

/// A destination bit identity, used to detect multiple drivers and to
/// check every required input pin is driven.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum DestKey {
    GatePin(shdl_ir::GateId, Pin),
    PortBit(shdl_common::Ident, u32),
}

fn dest_key(e: &Endpoint) -> DestKey {
    match *e {
        Endpoint::Gate { gate, pin } => DestKey::GatePin(gate, pin),
        Endpoint::Port { port, bit } => DestKey::PortBit(port, bit),
    }
}

/// Validates every connection's endpoints, reports multi-driver conflicts,
/// and reports gate input pins with no driver at all.
pub fn validate(netlist: &Netlist, interner: &Interner, sink: &DiagnosticSink) {
    let mut drivers: HashMap<DestKey, Vec<Span>> = HashMap::new();

    for conn in &netlist.connections {
        validate_source(netlist, conn, sink);
        validate_destination(netlist, conn, sink);
        drivers.entry(dest_key(&conn.destination)).or_default().push(conn.span);
    }

    for (key, spans) in &drivers {
        if spans.len() > 1 {
            let label = describe_dest(netlist, interner, *key);
            for &span in &spans[1..] {
                sink.emit(errors::error_multi_driver(&label, span));
            }
        }
    }

    for (gate_id, gate) in netlist.gates.iter() {
        for pin_name in gate.kind.input_ports() {
            let pin = Pin::from_name(pin_name).expect("primitive input pin name");
            let key = DestKey::GatePin(gate_id, pin);
            if !drivers.contains_key(&key) {
                sink.emit(errors::error_missing_driver(interner.resolve(gate.name), pin_name, gate.span));
            }
        }
    }
}

fn validate_source(netlist: &Netlist, conn: &Connection, sink: &DiagnosticSink) {
    match conn.source {
        Endpoint::Gate { gate, pin } => {
            if pin != Pin::O {
                sink.emit(errors::error_invalid_endpoint(
                    format!("`{}` cannot be a source: only a gate's `O` pin drives anything", pin.name()),
                    conn.span,
                ));
            }
            check_gate_exists(netlist, gate, conn.span, sink);
        }
        Endpoint::Port { port, bit } => {
            check_port_bit(netlist.inputs.iter(), port, bit, "input", conn.span, sink);
        }
    }
}

fn validate_destination(netlist: &Netlist, conn: &Connection, sink: &DiagnosticSink) {
    match conn.destination {
        Endpoint::Gate { gate, pin } => {
            if let Some(g) = get_gate(netlist, gate) {
                if pin == Pin::O {
                    sink.emit(errors::error_invalid_endpoint(
                        "a gate's `O` pin cannot be a connection destination",
                        conn.span,
                    ));
                } else if !g.kind.has_input(pin.name()) {
                    sink.emit(errors::error_invalid_endpoint(
                        format!("`{}` has no `{}` pin", g.kind, pin.name()),
                        conn.span,
                    ));
                }
            } else {
                sink.emit(errors::error_invalid_endpoint("connection destination references an unknown gate", conn.span));
            }
        }
        Endpoint::Port { port, bit } => {
            check_port_bit(netlist.outputs.iter(), port, bit, "output", conn.span, sink);
        }
    }
}

fn check_gate_exists(netlist: &Netlist, gate: shdl_ir::GateId, span: Span, sink: &DiagnosticSink) {
    if get_gate(netlist, gate).is_none() {
        sink.emit(errors::error_invalid_endpoint("connection source references an unknown gate", span));
    }
}

fn get_gate(netlist: &Netlist, id: shdl_ir::GateId) -> Option<&Gate> {
    netlist.gates.iter().find(|(gid, _)| *gid == id).map(|(_, g)| g)
}

fn check_port_bit<'a>(
    ports: impl Iterator<Item = &'a shdl_ast::Port>,
    port: shdl_common::Ident,
    bit: u32,
    role: &str,
    span: Span,
    sink: &DiagnosticSink,
) {
    match ports.into_iter().find(|p| p.name == port) {
        Some(p) => {
            if bit < 1 || bit > p.bit_count() {
                sink.emit(errors::error_invalid_endpoint(
                    format!("bit {bit} out of range for {role} port (width {})", p.bit_count()),
                    span,
                ));
            }
        }
        None => {
            sink.emit(errors::error_invalid_endpoint(format!("reference to unknown {role} port"), span));
        }
    }
}

fn describe_dest(netlist: &Netlist, interner: &Interner, key: DestKey) -> String {
    match key {
        DestKey::GatePin(gate, pin) => match get_gate(netlist, gate) {
            Some(g) => format!("{}.{}", interner.resolve(g.name), pin.name()),
            None => format!("<unknown gate>.{}", pin.name()),
        },
        DestKey::PortBit(port, bit) => format!("{}[{bit}]", interner.resolve(port)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shdl_ast::{Port, PrimitiveKind};
    use shdl_ir::Arena;

    fn netlist_with_and_gate(interner: &Interner) -> (Netlist, shdl_ir::GateId) {
        let a = interner.get_or_intern("A");
        let b = interner.get_or_intern("B");
        let o = interner.get_or_intern("O");
        let mut gates = Arena::new();
        let gate_id = gates.alloc(Gate {
            name: interner.get_or_intern("a1"),
            kind: PrimitiveKind::And,
            span: Span::DUMMY,
        });
        let netlist = Netlist {
            name: interner.get_or_intern("T"),
            inputs: vec![
                Port { name: a, width: None, span: Span::DUMMY },
                Port { name: b, width: None, span: Span::DUMMY },
            ],
            outputs: vec![Port { name: o, width: None, span: Span::DUMMY }],
            gates,
            connections: vec![],
            span: Span::DUMMY,
        };
        (netlist, gate_id)
    }

    #[test]
    fn fully_wired_gate_has_no_errors() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let (mut netlist, gate_id) = netlist_with_and_gate(&interner);
        let a = interner.get_or_intern("A");
        let b = interner.get_or_intern("B");
        let o = interner.get_or_intern("O");
        netlist.connections.push(Connection {
            source: Endpoint::Port { port: a, bit: 1 },
            destination: Endpoint::Gate { gate: gate_id, pin: Pin::A },
            span: Span::DUMMY,
        });
        netlist.connections.push(Connection {
            source: Endpoint::Port { port: b, bit: 1 },
            destination: Endpoint::Gate { gate: gate_id, pin: Pin::B },
            span: Span::DUMMY,
        });
        netlist.connections.push(Connection {
            source: Endpoint::Gate { gate: gate_id, pin: Pin::O },
            destination: Endpoint::Port { port: o, bit: 1 },
            span: Span::DUMMY,
        });
        validate(&netlist, &interner, &sink);
        assert!(!sink.has_errors());
    }

    #[test]
    fn missing_driver_on_input_pin_reports_error() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let (mut netlist, gate_id) = netlist_with_and_gate(&interner);
        let a = interner.get_or_intern("A");
        netlist.connections.push(Connection {
            source: Endpoint::Port { port: a, bit: 1 },
            destination: Endpoint::Gate { gate: gate_id, pin: Pin::A },
            span: Span::DUMMY,
        });
        validate(&netlist, &interner, &sink);
        assert!(sink.has_errors());
    }

    #[test]
    fn multiple_drivers_on_same_destination_report_error() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let (mut netlist, gate_id) = netlist_with_and_gate(&interner);
        let a = interner.get_or_intern("A");
        let b = interner.get_or_intern("B");
        netlist.connections.push(Connection {
            source: Endpoint::Port { port: a, bit: 1 },
            destination: Endpoint::Gate { gate: gate_id, pin: Pin::A },
            span: Span::DUMMY,
        });
        netlist.connections.push(Connection {
            source: Endpoint::Port { port: b, bit: 1 },
            destination: Endpoint::Gate { gate: gate_id, pin: Pin::A },
            span: Span::DUMMY,
        });
        netlist.connections.push(Connection {
            source: Endpoint::Port { port: b, bit: 1 },
            destination: Endpoint::Gate { gate: gate_id, pin: Pin::B },
            span: Span::DUMMY,
        });
        validate(&netlist, &interner, &sink);
        assert!(sink.has_errors());
    }

    #[test]
    fn gate_output_as_destination_reports_error() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let (mut netlist, gate_id) = netlist_with_and_gate(&interner);
        let a = interner.get_or_intern("A");
        netlist.connections.push(Connection {
            source: Endpoint::Port { port: a, bit: 1 },
            destination: Endpoint::Gate { gate: gate_id, pin: Pin::O },
            span: Span::DUMMY,
        });
        validate(&netlist, &interner, &sink);
        assert!(sink.has_errors());
    }

    #[test]
    fn out_of_range_port_bit_reports_error() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let (mut netlist, _) = netlist_with_and_gate(&interner);
        let a = interner.get_or_intern("A");
        let o = interner.get_or_intern("O");
        netlist.connections.push(Connection {
            source: Endpoint::Port { port: a, bit: 3 },
            destination: Endpoint::Port { port: o, bit: 1 },
            span: Span::DUMMY,
        });
        validate(&netlist, &interner, &sink);
        assert!(sink.has_errors());
    }
}
