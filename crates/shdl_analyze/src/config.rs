//! Analyzer configuration.

/// Settings controlling which optional analyzer passes run.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnalyzeConfig {
    /// Runs the `petgraph`-based combinational-cycle check
    /// ([`crate::cycle::has_combinational_cycle`]) and emits a warning if
    /// one is found. Off by default: cycles are legal and the check costs
    /// a graph traversal no simulation run actually needs.
    pub check_acyclic: bool,
}
