//! `PackedProgram`: the precomputed gather/extract tables a [`Simulator`
//! crate::Simulator`] evaluates cycle by cycle.
//!
//! Building one from an [`Analysis`](shdl_analyze::Analysis) is the
//! "code generation" step of the pipeline (§2): rather than emitting and
//! compiling C source, this crate derives the same gather-table shape a
//! native backend would emit, and interprets it directly.

use std::collections::HashMap;

use shdl_ast::{Port, PrimitiveKind};
use shdl_common::Ident;
use shdl_ir::{Endpoint, GateId, Pin};

use shdl_analyze::{Analysis, LaneAssignment};

/// Where one gathered input bit comes from: a component input port bit, or
/// another gate's `O` lane from the previous cycle's state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Source {
    /// Bit `bit` of input port `port`.
    Input {
        /// The input port's interned name.
        port: Ident,
        /// 1-based bit index.
        bit: u32,
    },
    /// The `O` lane of a gate, identified by its packed position.
    Gate {
        /// The driving gate's primitive kind.
        kind: PrimitiveKind,
        /// Chunk index within that kind's state.
        chunk: usize,
        /// Lane (0..64) within that chunk.
        lane: u32,
    },
}

/// The gather list for one (kind, chunk)'s `A` and `B` input pins: for each
/// distinct [`Source`], the mask of lanes within this chunk that pin reads
/// it on.
#[derive(Clone, Debug, Default)]
pub struct PinGathers {
    /// Sources feeding the `A` pin, each paired with its destination lane mask.
    pub a: Vec<(Source, u64)>,
    /// Sources feeding the `B` pin (empty for `NOT`/`VCC`/`GND`).
    pub b: Vec<(Source, u64)>,
}

/// What drives a top-level output port bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OutputDriver {
    /// Driven by a gate's `O` lane.
    Gate {
        /// The driving gate's primitive kind.
        kind: PrimitiveKind,
        /// Chunk index.
        chunk: usize,
        /// Lane within that chunk.
        lane: u32,
    },
    /// Driven directly by an input port bit (a wire-through with no
    /// intervening gate).
    Input {
        /// The driving input port's interned name.
        port: Ident,
        /// 1-based bit index.
        bit: u32,
    },
}

/// The precomputed, immutable program a [`crate::Simulator`] evaluates.
///
/// Built once from an [`Analysis`]; never mutated afterward. Cheap to
/// share between simulator handles via `Arc` since it carries no runtime
/// state of its own.
pub struct PackedProgram {
    /// Number of 64-lane chunks allocated per primitive kind.
    pub chunk_counts: HashMap<PrimitiveKind, usize>,
    /// Populated-lane mask for each (kind, chunk), so unused lanes never
    /// flap during evaluation.
    pub active_mask: HashMap<(PrimitiveKind, usize), u64>,
    /// Gather tables for every (kind, chunk) with at least one input pin.
    pub gathers: HashMap<(PrimitiveKind, usize), PinGathers>,
    /// What drives each output port bit.
    pub outputs: HashMap<(Ident, u32), OutputDriver>,
    /// Declared input ports, in declaration order.
    pub inputs: Vec<Port>,
    /// Declared output ports, in declaration order.
    pub output_ports: Vec<Port>,
    /// Every gate's packed lane, for the debug-only gate-peek entry point.
    pub gate_lanes: HashMap<GateId, LaneAssignment>,
    /// Every gate's fully-qualified name, for the debug-only gate-peek
    /// entry point's name-to-`GateId` lookup.
    pub gate_names: HashMap<Ident, GateId>,
}

impl PackedProgram {
    /// Builds a program from a completed [`Analysis`].
    ///
    /// Does not itself check `analysis` for errors; a caller that skipped
    /// the error check after [`shdl_analyze::analyze`] gets a program
    /// whose behavior on an invalid netlist is unspecified but not
    /// undefined (it will not panic: every lookup here degrades to "drive
    /// nothing" rather than indexing out of bounds).
    pub fn build(analysis: &Analysis) -> Self {
        let netlist = &analysis.netlist;
        let lanes = &analysis.lanes.assignments;

        let mut active_mask: HashMap<(PrimitiveKind, usize), u64> = HashMap::new();
        let mut gate_names = HashMap::new();
        for (gate_id, gate) in netlist.gates.iter() {
            if let Some(&assign) = lanes.get(&gate_id) {
                *active_mask.entry((assign.kind, assign.chunk)).or_insert(0) |= 1u64 << assign.lane;
            }
            gate_names.insert(gate.name, gate_id);
        }

        let mut gathers: HashMap<(PrimitiveKind, usize), PinGathers> = HashMap::new();
        let mut outputs = HashMap::new();

        for conn in &netlist.connections {
            match conn.destination {
                Endpoint::Gate { gate, pin } if pin != Pin::O => {
                    let Some(&assign) = lanes.get(&gate) else { continue };
                    let entry = gathers.entry((assign.kind, assign.chunk)).or_default();
                    let list = match pin {
                        Pin::A => &mut entry.a,
                        Pin::B => &mut entry.b,
                        Pin::O => unreachable!("filtered above"),
                    };
                    let src = to_source(conn.source, lanes);
                    merge(list, src, assign.lane);
                }
                Endpoint::Gate { .. } => {}
                Endpoint::Port { port, bit } => {
                    let driver = match conn.source {
                        Endpoint::Port { port: sp, bit: sb } => OutputDriver::Input { port: sp, bit: sb },
                        Endpoint::Gate { gate, .. } => match lanes.get(&gate) {
                            Some(&assign) => OutputDriver::Gate { kind: assign.kind, chunk: assign.chunk, lane: assign.lane },
                            None => continue,
                        },
                    };
                    outputs.insert((port, bit), driver);
                }
            }
        }

        PackedProgram {
            chunk_counts: analysis.lanes.chunk_counts.clone(),
            active_mask,
            gathers,
            outputs,
            inputs: netlist.inputs.clone(),
            output_ports: netlist.outputs.clone(),
            gate_lanes: lanes.clone(),
            gate_names,
        }
    }
}

fn to_source(endpoint: Endpoint, lanes: &HashMap<GateId, LaneAssignment>) -> Source {
    match endpoint {
        Endpoint::Port { port, bit } => Source::Input { port, bit },
        Endpoint::Gate { gate, .. } => {
            let assign = lanes.get(&gate).copied().unwrap_or(LaneAssignment {
                kind: PrimitiveKind::Gnd,
                chunk: 0,
                lane: 0,
            });
            Source::Gate { kind: assign.kind, chunk: assign.chunk, lane: assign.lane }
        }
    }
}

fn merge(list: &mut Vec<(Source, u64)>, src: Source, lane: u32) {
    let mask = 1u64 << lane;
    match list.iter_mut().find(|(s, _)| *s == src) {
        Some((_, existing)) => *existing |= mask,
        None => list.push((src, mask)),
    }
}
