//! Packed-lane assignment: gives every gate a `(kind, chunk, lane)` triple
//! the simulator uses to place its state inside 64-bit words.
//!
//! Gates are grouped by [`PrimitiveKind`] and packed in declaration order
//! (the order they were allocated into the netlist's [`Arena`]), filling 64
//! lanes of one chunk before moving to the next. Declaration-order-dense
//! packing keeps lane assignment deterministic and independent of anything
//! but the netlist itself, which matters for reproducible debug-info
//! sidecars across recompiles.

use std::collections::HashMap;

use shdl_ast::PrimitiveKind;
use shdl_ir::{GateId, Netlist};

/// 64 packed lanes per chunk: one `u64` word holds one chunk's worth of
/// state for a given primitive kind.
pub const LANES_PER_CHUNK: u32 = 64;

/// Where one gate's simulated state lives: which kind's state arrays,
/// which chunk (word) within them, and which bit lane within that word.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LaneAssignment {
    /// The gate's primitive kind (state arrays are partitioned by kind).
    pub kind: PrimitiveKind,
    /// Index of the 64-lane chunk this gate's state lives in.
    pub chunk: usize,
    /// Bit lane (0..64) within that chunk.
    pub lane: u32,
}

/// Per-kind lane assignments for every gate in a netlist, plus how many
/// chunks each kind needs.
pub struct LaneLayout {
    /// Every gate's assigned lane.
    pub assignments: HashMap<GateId, LaneAssignment>,
    /// Number of 64-lane chunks allocated for each kind.
    pub chunk_counts: HashMap<PrimitiveKind, usize>,
}

/// Assigns lanes to every gate in `netlist`, in arena (declaration) order.
pub fn assign(netlist: &Netlist) -> LaneLayout {
    let mut next_index: HashMap<PrimitiveKind, u32> = HashMap::new();
    let mut assignments = HashMap::new();

    for (id, gate) in netlist.gates.iter() {
        let index = next_index.entry(gate.kind).or_insert(0);
        let chunk = (*index / LANES_PER_CHUNK) as usize;
        let lane = *index % LANES_PER_CHUNK;
        assignments.insert(id, LaneAssignment { kind: gate.kind, chunk, lane });
        *index += 1;
    }

    let mut chunk_counts = HashMap::new();
    for kind in PrimitiveKind::ALL {
        let count = next_index.get(&kind).copied().unwrap_or(0);
        let chunks = count.div_ceil(LANES_PER_CHUNK) as usize;
        chunk_counts.insert(kind, chunks);
    }

    LaneLayout { assignments, chunk_counts }
}
