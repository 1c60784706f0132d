//! Simulator configuration.

use serde::{Deserialize, Serialize};

/// Settings controlling optional simulator behavior.
///
/// Loadable from TOML the same way [`shdl_analyze::AnalyzeConfig`]'s
/// sibling `CompileConfig` is; see `shdl_cli` for the host that actually
/// reads a file into one of these.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// Allows [`crate::Simulator::peek`] to resolve a gate's fully-qualified
    /// instance name directly, bypassing ports entirely. Off by default:
    /// gate names are an implementation detail of the flattener's renaming
    /// scheme, not part of the stable host-facing signal namespace.
    pub enable_gate_peek: bool,
    /// Evaluates each primitive kind's chunks with `rayon` instead of a
    /// plain sequential loop. Chunks are independent given the previous
    /// cycle's state, so this never changes the result, only the wall
    /// clock; off by default because most netlists are too small for the
    /// thread-pool overhead to pay for itself.
    pub parallel: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { enable_gate_peek: false, parallel: false }
    }
}
