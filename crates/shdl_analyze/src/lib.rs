//! The Analyzer: validates a flattened [`Netlist`](shdl_ir::Netlist) and
//! assigns every gate its packed-simulation lane.
//!
//! Runs, in order: [`symbols`] (duplicate gate/port names), [`connections`]
//! (endpoint validity, multi-driver conflicts, missing drivers),
//! [`warnings`] (unused ports, unreferenced constants, undriven outputs),
//! the optional [`cycle`] pass if [`AnalyzeConfig::check_acyclic`] is set,
//! and finally [`lanes`] (packed-lane assignment for the simulator). A
//! netlist with any error-severity diagnostic should not be handed to
//! `shdl_sim`; the caller decides that by checking the sink, the same way
//! `shdl_flatten` leaves it to its caller.

#![warn(missing_docs)]

pub mod config;
pub mod connections;
pub mod cycle;
pub mod errors;
pub mod lanes;
pub mod symbols;
pub mod warnings;

use shdl_common::Interner;
use shdl_diagnostics::DiagnosticSink;
use shdl_ir::Netlist;

pub use config::AnalyzeConfig;
pub use lanes::{LaneAssignment, LaneLayout};

/// The result of analyzing one flattened netlist: the netlist itself, plus
/// its packed-lane layout.
pub struct Analysis {
    /// The analyzed netlist, unchanged.
    pub netlist: Netlist,
    /// Packed-lane assignment for every gate.
    pub lanes: LaneLayout,
}

/// Analyzes `netlist`, emitting every diagnostic to `sink`, and returns the
/// lane-assigned [`Analysis`] regardless of whether errors were found.
///
/// Callers that need a simulator must check `sink.has_errors()` themselves
/// before acting on the result; an `Analysis` built from an invalid
/// netlist is still returned so a caller can inspect what lane assignment
/// would have looked like, or so multiple components can be analyzed
/// before any of them is rejected.
pub fn analyze(netlist: Netlist, config: &AnalyzeConfig, interner: &Interner, sink: &DiagnosticSink) -> Analysis {
    symbols::check_unique_names(&netlist, interner, sink);
    connections::validate(&netlist, interner, sink);
    warnings::collect(&netlist, interner, sink);

    if config.check_acyclic && cycle::has_combinational_cycle(&netlist) {
        sink.emit(errors::warn_combinational_cycle(netlist.span));
    }

    let lanes = lanes::assign(&netlist);
    Analysis { netlist, lanes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shdl_ast::{Port, PrimitiveKind};
    use shdl_ir::{Arena, Connection, Endpoint, Gate, Pin};
    use shdl_source::Span;

    #[test]
    fn analyzes_a_well_formed_and_gate() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
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
            name: interner.get_or_intern("AndGate"),
            inputs: vec![
                Port { name: a, width: None, span: Span::DUMMY },
                Port { name: b, width: None, span: Span::DUMMY },
            ],
            outputs: vec![Port { name: o, width: None, span: Span::DUMMY }],
            gates,
            connections: vec![
                Connection {
                    source: Endpoint::Port { port: a, bit: 1 },
                    destination: Endpoint::Gate { gate: gate_id, pin: Pin::A },
                    span: Span::DUMMY,
                },
                Connection {
                    source: Endpoint::Port { port: b, bit: 1 },
                    destination: Endpoint::Gate { gate: gate_id, pin: Pin::B },
                    span: Span::DUMMY,
                },
                Connection {
                    source: Endpoint::Gate { gate: gate_id, pin: Pin::O },
                    destination: Endpoint::Port { port: o, bit: 1 },
                    span: Span::DUMMY,
                },
            ],
            span: Span::DUMMY,
        };

        let analysis = analyze(netlist, &AnalyzeConfig::default(), &interner, &sink);
        assert!(!sink.has_errors());
        assert!(sink.diagnostics().is_empty());
        assert_eq!(analysis.lanes.assignments.len(), 1);
    }

    #[test]
    fn cycle_check_is_off_by_default() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let mut gates = Arena::new();
        let n1 = gates.alloc(Gate {
            name: interner.get_or_intern("n1"),
            kind: PrimitiveKind::Not,
            span: Span::DUMMY,
        });
        let netlist = Netlist {
            name: interner.get_or_intern("Loop"),
            inputs: vec![],
            outputs: vec![],
            gates,
            connections: vec![Connection {
                source: Endpoint::Gate { gate: n1, pin: Pin::O },
                destination: Endpoint::Gate { gate: n1, pin: Pin::A },
                span: Span::DUMMY,
            }],
            span: Span::DUMMY,
        };
        analyze(netlist, &AnalyzeConfig::default(), &interner, &sink);
        assert!(sink.diagnostics().iter().all(|d| d.code != errors::W203));
    }

    #[test]
    fn cycle_check_warns_when_enabled() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let mut gates = Arena::new();
        let n1 = gates.alloc(Gate {
            name: interner.get_or_intern("n1"),
            kind: PrimitiveKind::Not,
            span: Span::DUMMY,
        });
        let netlist = Netlist {
            name: interner.get_or_intern("Loop"),
            inputs: vec![],
            outputs: vec![],
            gates,
            connections: vec![Connection {
                source: Endpoint::Gate { gate: n1, pin: Pin::O },
                destination: Endpoint::Gate { gate: n1, pin: Pin::A },
                span: Span::DUMMY,
            }],
            span: Span::DUMMY,
        };
        let config = AnalyzeConfig { check_acyclic: true };
        analyze(netlist, &config, &interner, &sink);
        assert!(sink.diagnostics().iter().any(|d| d.code == errors::W203));
    }
}
