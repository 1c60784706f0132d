//! Optional combinational-cycle detection, off by default.
//!
//! A cycle among gates is legal: the simulator's two-phase update settles
//! it the same way real hardware does, it just never forms a stable latch
//! without help from the step boundary. Detecting one is purely
//! informational, so this pass is opt-in (see [`crate::AnalyzeConfig`])
//! rather than folded into [`crate::analyze`]'s unconditional checks.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use shdl_ir::{Endpoint, GateId, Netlist, Pin};

/// `true` if `netlist`'s gate-to-gate connections contain a directed cycle.
///
/// Only gate-to-gate edges are considered: a port feeding back into the
/// gates that ultimately drive it is exactly what a sequential design
/// would look like from outside, and ports carry no state of their own to
/// cycle through.
pub fn has_combinational_cycle(netlist: &Netlist) -> bool {
    let mut graph = DiGraph::<(), ()>::new();
    let mut nodes: HashMap<GateId, NodeIndex> = HashMap::new();

    for (id, _) in netlist.gates.iter() {
        nodes.insert(id, graph.add_node(()));
    }

    for conn in &netlist.connections {
        if let (Endpoint::Gate { gate: src, pin: Pin::O }, Endpoint::Gate { gate: dst, .. }) =
            (conn.source, conn.destination)
        {
            graph.add_edge(nodes[&src], nodes[&dst], ());
        }
    }

    is_cyclic_directed(&graph)
}
