//! The debug-info sidecar: a JSON document describing one analyzed
//! component's ports, packed gates, and source locations.
//!
//! Unlike the build-artifact cache this crate used to be, the sidecar
//! carries no binary header, checksum, or format-version envelope — it is
//! plain `serde_json`, saved pretty-printed and loaded fail-safe (a
//! missing or corrupt file is a silent `None`, never a panic). A host
//! tool that does not care about debug info never has to touch this
//! crate at all; the simulator is fully functional without it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use shdl_analyze::Analysis;
use shdl_common::Interner;

use crate::error::DebugInfoError;

/// One declared port's name and bit width.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortInfo {
    /// The port's source-level name.
    pub name: String,
    /// Declared width in bits.
    pub width: u32,
}

/// One gate's packed position and hierarchy origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateInfo {
    /// The gate's flattened instance name.
    pub name: String,
    /// The primitive kind's reserved spelling (`"AND"`, `"OR"`, `"XOR"`,
    /// `"NOT"`, `"__VCC__"`, `"__GND__"`).
    pub kind: String,
    /// Packed chunk index within its kind.
    pub chunk: usize,
    /// Packed lane (0..64) within that chunk.
    pub lane: u32,
    /// Best-effort hierarchy path, recovered by splitting the flattened
    /// name on the instance separator the flattener joins with. Purely
    /// informational: a name component containing a literal `_` of its
    /// own cannot be told apart from a separator here.
    pub path: Vec<String>,
}

/// A byte-range source location, as recorded on the IR node it describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Raw `shdl_source::FileId` this location belongs to.
    pub file: u32,
    /// Start byte offset, inclusive.
    pub start: u32,
    /// End byte offset, exclusive.
    pub end: u32,
}

/// Debug info for a single component: its ports, its gates, and a map from
/// gate/port name to source location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComponentDebugInfo {
    /// Input ports, in declaration order.
    pub inputs: Vec<PortInfo>,
    /// Output ports, in declaration order.
    pub outputs: Vec<PortInfo>,
    /// Every gate surviving flattening, in arena order.
    pub gates: Vec<GateInfo>,
    /// Source location for every gate and port, keyed by name.
    pub source_locations: HashMap<String, SourceLocation>,
}

/// A complete debug-info document, keyed by component name.
///
/// A single file can describe every component analyzed in one compile
/// session; most callers will have exactly one entry, the top-level
/// design being simulated.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DebugInfo {
    /// Per-component debug info, keyed by component name.
    pub components: HashMap<String, ComponentDebugInfo>,
}

impl DebugInfo {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds (or replaces) the entry for `component_name` from a completed
    /// analysis.
    pub fn record(&mut self, component_name: &str, analysis: &Analysis, interner: &Interner) {
        let netlist = &analysis.netlist;

        let inputs = netlist
            .inputs
            .iter()
            .map(|p| PortInfo { name: interner.resolve(p.name).to_string(), width: p.bit_count() })
            .collect();
        let outputs = netlist
            .outputs
            .iter()
            .map(|p| PortInfo { name: interner.resolve(p.name).to_string(), width: p.bit_count() })
            .collect();

        let mut gates = Vec::with_capacity(netlist.gates.len());
        let mut source_locations = HashMap::new();

        for (gate_id, gate) in netlist.gates.iter() {
            let name = interner.resolve(gate.name).to_string();
            source_locations.insert(
                name.clone(),
                SourceLocation { file: gate.span.file.as_raw(), start: gate.span.start, end: gate.span.end },
            );
            let assign = analysis.lanes.assignments.get(&gate_id);
            gates.push(GateInfo {
                path: name.split('_').map(str::to_string).collect(),
                kind: gate.kind.name().to_string(),
                chunk: assign.map(|a| a.chunk).unwrap_or(0),
                lane: assign.map(|a| a.lane).unwrap_or(0),
                name,
            });
        }

        for port in netlist.all_ports() {
            source_locations.insert(
                interner.resolve(port.name).to_string(),
                SourceLocation { file: port.span.file.as_raw(), start: port.span.start, end: port.span.end },
            );
        }

        self.components
            .insert(component_name.to_string(), ComponentDebugInfo { inputs, outputs, gates, source_locations });
    }

    /// Loads a debug-info document from `path`.
    ///
    /// Fail-safe: any I/O error or parse failure results in `None` rather
    /// than a panic or an `Err`, mirroring the teacher's cache-manifest
    /// loading contract.
    pub fn load(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Saves this document to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), DebugInfoError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DebugInfoError::Serialization { reason: e.to_string() })?;
        std::fs::write(path, json).map_err(|e| DebugInfoError::Io { path: path.to_path_buf(), source: e })
    }
}
