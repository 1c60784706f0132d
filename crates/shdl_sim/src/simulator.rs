//! The cycle-by-cycle packed simulator and its host-facing `reset`/`poke`/
//! `peek`/`step` contract.

use std::collections::HashMap;

use shdl_ast::PrimitiveKind;
use shdl_common::{Ident, Interner};
use shdl_ir::{GateId, Pin};

use shdl_analyze::Analysis;

use crate::config::SimConfig;
use crate::program::{OutputDriver, PackedProgram, Source};

/// A running instance of a compiled netlist.
///
/// Exclusively owns its packed state; two `Simulator`s built from the same
/// [`PackedProgram`] (cheaply shareable via `Arc` once built) evolve
/// independently. There is no intra-cycle forward propagation: every gate
/// at cycle `t+1` reads only cycle-`t` state and the currently-poked
/// inputs (§4.4).
pub struct Simulator {
    program: PackedProgram,
    name_to_input: HashMap<String, Ident>,
    name_to_output: HashMap<String, Ident>,
    name_to_gate: HashMap<String, GateId>,
    state: HashMap<PrimitiveKind, Vec<u64>>,
    inputs: HashMap<Ident, u64>,
    cached_outputs: Option<HashMap<Ident, u64>>,
    /// Set by `poke`, cleared by `step`: whether the committed gate state in
    /// `self.state` still reflects the currently-poked inputs. While set,
    /// output extraction must perform one uncommitted settling pass (§4.4,
    /// §9) rather than read `self.state` as-is.
    inputs_dirty: bool,
    pending_warnings: Vec<String>,
    config: SimConfig,
}

impl Simulator {
    /// Builds a simulator from a completed analysis.
    ///
    /// `interner` is consulted once, here, to resolve every port and gate
    /// name into the `String`-keyed lookup tables `poke`/`peek` use; the
    /// hot cycle-evaluation loop afterward never touches it.
    pub fn new(analysis: &Analysis, interner: &Interner, config: SimConfig) -> Self {
        let program = PackedProgram::build(analysis);

        let name_to_input = program.inputs.iter().map(|p| (interner.resolve(p.name).to_string(), p.name)).collect();
        let name_to_output =
            program.output_ports.iter().map(|p| (interner.resolve(p.name).to_string(), p.name)).collect();
        let name_to_gate =
            program.gate_names.iter().map(|(&name, &id)| (interner.resolve(name).to_string(), id)).collect();

        let state = zeroed_state(&program.chunk_counts);

        Simulator {
            program,
            name_to_input,
            name_to_output,
            name_to_gate,
            state,
            inputs: HashMap::new(),
            cached_outputs: None,
            inputs_dirty: false,
            pending_warnings: Vec::new(),
            config,
        }
    }

    /// Clears all gate state and poked input values to zero, and drops any
    /// cached output values.
    pub fn reset(&mut self) {
        self.state = zeroed_state(&self.program.chunk_counts);
        self.inputs.clear();
        self.cached_outputs = None;
        self.inputs_dirty = false;
    }

    /// Stores `value`, masked to the named input port's declared width, as
    /// that port's current drive. Invalidates cached output values and marks
    /// the committed gate state stale: the next output `peek` must settle
    /// once from this new input before reporting a value (§4.4, §9).
    ///
    /// An unknown name is logged via [`Self::take_pending_warnings`] and
    /// otherwise ignored; `poke` never panics or fails loudly.
    pub fn poke(&mut self, name: &str, value: u64) {
        let Some(&ident) = self.name_to_input.get(name) else {
            self.warn_unknown_signal(name);
            return;
        };
        let width = self.program.inputs.iter().find(|p| p.name == ident).map(|p| p.bit_count()).unwrap_or(64);
        self.inputs.insert(ident, mask_to_width(value, width));
        self.cached_outputs = None;
        self.inputs_dirty = true;
    }

    /// Returns the named signal's current value: the stored drive for an
    /// input port, the settled value for an output port (recomputed from
    /// current state on demand and cached until the next `poke`/`step`),
    /// or — only when [`SimConfig::enable_gate_peek`] is set — a gate's raw
    /// output lane by its fully-qualified instance name.
    ///
    /// An unknown name (or a gate name when gate-peek is disabled) is
    /// logged and returns `0`.
    pub fn peek(&mut self, name: &str) -> u64 {
        if let Some(&ident) = self.name_to_input.get(name) {
            return self.inputs.get(&ident).copied().unwrap_or(0);
        }
        if let Some(&ident) = self.name_to_output.get(name) {
            if self.cached_outputs.is_none() {
                self.cached_outputs = Some(if self.inputs_dirty {
                    self.extract_outputs(&self.compute_next_state())
                } else {
                    self.extract_outputs(&self.state)
                });
            }
            return self.cached_outputs.as_ref().and_then(|m| m.get(&ident)).copied().unwrap_or(0);
        }
        if self.config.enable_gate_peek {
            if let Some(&gate_id) = self.name_to_gate.get(name) {
                if let Some(&assign) = self.program.gate_lanes.get(&gate_id) {
                    let bit = self.read_source(Source::Gate { kind: assign.kind, chunk: assign.chunk, lane: assign.lane }, &self.state);
                    return bit as u64;
                }
            }
        }
        self.warn_unknown_signal(name);
        0
    }

    /// Advances simulation by `n` cycles. Negative `n` is clamped to zero.
    pub fn step(&mut self, n: i64) {
        let n = n.max(0);
        if n == 0 {
            return;
        }
        for _ in 0..n {
            self.state = self.compute_next_state();
        }
        self.cached_outputs = None;
        self.inputs_dirty = false;
    }

    /// Drains and returns every informational warning (unknown-signal
    /// `poke`/`peek`s) accumulated since the last call.
    ///
    /// The simulator has no [`shdl_diagnostics::DiagnosticSink`] of its own
    /// — it is a headless runtime object — so a host that wants these
    /// surfaced through its own logging polls this instead.
    pub fn take_pending_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_warnings)
    }

    fn warn_unknown_signal(&mut self, name: &str) {
        self.pending_warnings.push(format!("poke/peek of unknown signal `{name}`"));
    }

    /// Computes the next cycle's gate state from `self.state` and the
    /// currently-poked inputs, without committing it. `step` commits the
    /// result; output `peek` after a `poke` uses it for one uncommitted
    /// settling pass (§4.4, §9).
    fn compute_next_state(&self) -> HashMap<PrimitiveKind, Vec<u64>> {
        let work: Vec<(PrimitiveKind, usize)> = PrimitiveKind::ALL
            .iter()
            .flat_map(|&kind| {
                let chunks = self.program.chunk_counts.get(&kind).copied().unwrap_or(0);
                (0..chunks).map(move |chunk| (kind, chunk))
            })
            .collect();

        let results: Vec<((PrimitiveKind, usize), u64)> = if self.config.parallel {
            use rayon::prelude::*;
            work.par_iter().map(|&(kind, chunk)| ((kind, chunk), self.compute_chunk(kind, chunk, &self.state))).collect()
        } else {
            work.iter().map(|&(kind, chunk)| ((kind, chunk), self.compute_chunk(kind, chunk, &self.state))).collect()
        };

        let mut new_state = zeroed_state(&self.program.chunk_counts);
        for ((kind, chunk), value) in results {
            if let Some(chunks) = new_state.get_mut(&kind) {
                chunks[chunk] = value;
            }
        }
        new_state
    }

    fn compute_chunk(&self, kind: PrimitiveKind, chunk: usize, state: &HashMap<PrimitiveKind, Vec<u64>>) -> u64 {
        let active = self.program.active_mask.get(&(kind, chunk)).copied().unwrap_or(0);
        let a = self.gather(kind, chunk, Pin::A, state);
        let b = self.gather(kind, chunk, Pin::B, state);
        match kind {
            PrimitiveKind::And => (a & b) & active,
            PrimitiveKind::Or => (a | b) & active,
            PrimitiveKind::Xor => (a ^ b) & active,
            PrimitiveKind::Not => (!a) & active,
            PrimitiveKind::Vcc => active,
            PrimitiveKind::Gnd => 0,
        }
    }

    fn gather(&self, kind: PrimitiveKind, chunk: usize, pin: Pin, state: &HashMap<PrimitiveKind, Vec<u64>>) -> u64 {
        let Some(entry) = self.program.gathers.get(&(kind, chunk)) else { return 0 };
        let list = match pin {
            Pin::A => &entry.a,
            Pin::B => &entry.b,
            Pin::O => return 0,
        };
        let mut acc = 0u64;
        for &(src, lane_mask) in list {
            let bit = self.read_source(src, state) as u64;
            acc |= u64::wrapping_neg(bit) & lane_mask;
        }
        acc
    }

    fn read_source(&self, src: Source, state: &HashMap<PrimitiveKind, Vec<u64>>) -> bool {
        match src {
            Source::Input { port, bit } => {
                let raw = self.inputs.get(&port).copied().unwrap_or(0);
                (raw >> (bit - 1)) & 1 != 0
            }
            Source::Gate { kind, chunk, lane } => state
                .get(&kind)
                .and_then(|chunks| chunks.get(chunk))
                .map(|word| (word >> lane) & 1 != 0)
                .unwrap_or(false),
        }
    }

    /// Extracts every top-level output port's value from `state` (either the
    /// committed `self.state`, or an uncommitted one-step settling pass
    /// computed by [`Self::compute_next_state`]).
    fn extract_outputs(&self, state: &HashMap<PrimitiveKind, Vec<u64>>) -> HashMap<Ident, u64> {
        let mut result = HashMap::new();
        for port in &self.program.output_ports {
            let mut value = 0u64;
            for bit in 1..=port.bit_count() {
                let driven = match self.program.outputs.get(&(port.name, bit)) {
                    Some(&OutputDriver::Gate { kind, chunk, lane }) => {
                        self.read_source(Source::Gate { kind, chunk, lane }, state)
                    }
                    Some(&OutputDriver::Input { port: ip, bit: ib }) => {
                        self.read_source(Source::Input { port: ip, bit: ib }, state)
                    }
                    None => false,
                };
                if driven {
                    value |= 1 << (bit - 1);
                }
            }
            result.insert(port.name, value);
        }
        result
    }
}

fn zeroed_state(chunk_counts: &HashMap<PrimitiveKind, usize>) -> HashMap<PrimitiveKind, Vec<u64>> {
    PrimitiveKind::ALL
        .iter()
        .map(|&kind| (kind, vec![0u64; chunk_counts.get(&kind).copied().unwrap_or(0)]))
        .collect()
}

fn mask_to_width(value: u64, width: u32) -> u64 {
    if width >= 64 {
        value
    } else {
        value & ((1u64 << width) - 1)
    }
}
