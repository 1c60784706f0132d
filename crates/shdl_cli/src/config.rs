//! Compile-time configuration for the CLI harness.
//!
//! `CompileConfig` governs the library/flatten stages; `shdl_analyze`'s and
//! `shdl_sim`'s own `AnalyzeConfig`/`SimConfig` govern the stages after it.
//! All three load from the same TOML document, mirroring the project
//! configuration layer of the toolchain this crate descends from, reduced
//! to only the fields this pipeline actually consults.

use serde::{Deserialize, Serialize};

use shdl_analyze::AnalyzeConfig;
use shdl_sim::SimConfig;

/// Settings controlling module resolution and diagnostic accumulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Directories searched for a module file named `<module>.json`, in
    /// order, when a [`crate::moduledef::JsonModuleSource`] needs to
    /// resolve an import.
    #[serde(default)]
    pub search_paths: Vec<String>,
    /// Stop at the first error-severity diagnostic instead of accumulating
    /// every recoverable one.
    #[serde(default)]
    pub fail_fast: bool,
    /// Forwarded to [`AnalyzeConfig::check_acyclic`].
    #[serde(default)]
    pub check_acyclic: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self { search_paths: Vec::new(), fail_fast: false, check_acyclic: false }
    }
}

/// The full set of configuration this CLI reads from one TOML document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShdlConfig {
    /// Module resolution and diagnostic behavior.
    #[serde(default)]
    pub compile: CompileConfig,
    /// Simulator runtime behavior.
    #[serde(default)]
    pub sim: SimConfig,
}

impl ShdlConfig {
    /// Loads configuration from a TOML file, falling back to defaults for
    /// every field (and the whole document) the file omits.
    pub fn load(path: &std::path::Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
        toml::from_str(&text).map_err(|e| format!("parsing {}: {e}", path.display()))
    }

    /// Builds the [`AnalyzeConfig`] this configuration implies.
    pub fn analyze_config(&self) -> AnalyzeConfig {
        AnalyzeConfig { check_acyclic: self.compile.check_acyclic }
    }
}
