//! The step script: a small JSON-described sequence of `poke`/`step`/`peek`
//! operations run against a [`Simulator`].

use serde::{Deserialize, Serialize};

use shdl_sim::Simulator;

/// One operation in a step script.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepOp {
    /// Drives an input port.
    Poke {
        /// The input port's name.
        name: String,
        /// The value to drive it with.
        value: u64,
    },
    /// Advances the simulation by `cycles` cycles.
    Step {
        /// Number of cycles to advance.
        cycles: i64,
    },
    /// Reads a signal and records its value in the result list.
    Peek {
        /// The signal name to read.
        name: String,
    },
}

/// The result of one [`StepOp::Peek`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeekResult {
    /// The signal name that was read.
    pub name: String,
    /// The value observed.
    pub value: u64,
}

/// Parses a step script from JSON text: a top-level array of [`StepOp`]s.
pub fn parse_script(text: &str) -> Result<Vec<StepOp>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Runs `script` against `sim` in order, returning every `peek` result in
/// the order issued.
pub fn run_script(sim: &mut Simulator, script: &[StepOp]) -> Vec<PeekResult> {
    let mut results = Vec::new();
    for op in script {
        match op {
            StepOp::Poke { name, value } => sim.poke(name, *value),
            StepOp::Step { cycles } => sim.step(*cycles),
            StepOp::Peek { name } => results.push(PeekResult { name: name.clone(), value: sim.peek(name) }),
        }
    }
    results
}
