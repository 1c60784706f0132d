//! The flattened, Base-form netlist: the flattener's output and the
//! analyzer's and simulator's input.

use serde::{Deserialize, Serialize};
use shdl_ast::Port;
use shdl_common::Ident;
use shdl_source::Span;

use crate::arena::Arena;
use crate::endpoint::Connection;
use crate::gate::Gate;
use crate::ids::GateId;

/// A single flattened component: the result of running the four-phase
/// flattening transform over one Expanded-form
/// [`Component`](shdl_ast::Component) and all of its transitively
/// instantiated subcomponents.
///
/// A `Netlist` never references another `Netlist` or user component by
/// name — hierarchy inlining has already expanded every subcomponent
/// instance into this netlist's own flat gate list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Netlist {
    /// The originating component's name.
    pub name: Ident,
    /// Input ports, in declaration order, unchanged from the Expanded form
    /// (ports are never inlined away, only the instances wired to them).
    pub inputs: Vec<Port>,
    /// Output ports, in declaration order.
    pub outputs: Vec<Port>,
    /// Every primitive gate instance remaining after flattening.
    pub gates: Arena<GateId, Gate>,
    /// Every single-bit connection between ports and gate pins.
    pub connections: Vec<Connection>,
    /// Source location of the originating component declaration.
    pub span: Span,
}

impl Netlist {
    /// Looks up a gate instance by its fully-qualified name.
    ///
    /// Linear scan: intended for tests and diagnostics, not the hot path
    /// (the analyzer builds its own name-to-`GateId` table once).
    pub fn find_gate(&self, name: Ident) -> Option<GateId> {
        self.gates
            .iter()
            .find(|(_, gate)| gate.name == name)
            .map(|(id, _)| id)
    }

    /// Iterates over input and output ports, inputs first.
    pub fn all_ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Looks up a port (input or output) by interned name.
    pub fn port(&self, name: Ident) -> Option<&Port> {
        self.all_ports().find(|p| p.name == name)
    }

    /// Counts gate instances of a given primitive kind.
    pub fn count_kind(&self, kind: shdl_ast::PrimitiveKind) -> usize {
        self.gates.values().filter(|g| g.kind == kind).count()
    }
}

/// A collection of flattened netlists, one per originally-defined component,
/// keyed by component name.
///
/// Unlike an Expanded-form [`Module`](shdl_ast::Module), a `Design` has no
/// notion of imports or per-file grouping left: flattening has already
/// resolved every cross-module reference.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Design {
    /// The flattened netlists, in the order they were flattened.
    pub netlists: Vec<Netlist>,
}

impl Design {
    /// Looks up a flattened netlist by its originating component name.
    pub fn netlist(&self, name: Ident) -> Option<&Netlist> {
        self.netlists.iter().find(|n| n.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shdl_ast::PrimitiveKind;

    fn netlist_with_one_gate() -> Netlist {
        let mut gates = Arena::new();
        gates.alloc(Gate {
            name: Ident::from_raw(10),
            kind: PrimitiveKind::And,
            span: Span::DUMMY,
        });
        Netlist {
            name: Ident::from_raw(0),
            inputs: vec![],
            outputs: vec![],
            gates,
            connections: vec![],
            span: Span::DUMMY,
        }
    }

    #[test]
    fn find_gate_by_name() {
        let netlist = netlist_with_one_gate();
        assert!(netlist.find_gate(Ident::from_raw(10)).is_some());
        assert!(netlist.find_gate(Ident::from_raw(99)).is_none());
    }

    #[test]
    fn count_kind_matches() {
        let netlist = netlist_with_one_gate();
        assert_eq!(netlist.count_kind(PrimitiveKind::And), 1);
        assert_eq!(netlist.count_kind(PrimitiveKind::Or), 0);
    }

    #[test]
    fn design_netlist_lookup() {
        let design = Design {
            netlists: vec![netlist_with_one_gate()],
        };
        assert!(design.netlist(Ident::from_raw(0)).is_some());
        assert!(design.netlist(Ident::from_raw(1)).is_none());
    }
}
