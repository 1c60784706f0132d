//! Conformance test helpers for the shdl gate-level pipeline.
//!
//! There is no textual front-end in this workspace — parsing source text
//! into an [`shdl_ast::Module`] is the external parser's job. These tests
//! build that AST directly, the same way `shdl_flatten`'s and
//! `shdl_cli::pipeline`'s own unit tests do, and drive it through the full
//! library → flatten → analyze → sim pipeline to check the end-to-end
//! behaviors this pipeline promises.

use shdl_analyze::{Analysis, AnalyzeConfig};
use shdl_ast::{ArithExpr, Component, IndexSpec, Module, Port, SignalRef, TemplatedName};
use shdl_common::Interner;
use shdl_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use shdl_library::MapModuleSource;
use shdl_sim::{SimConfig, Simulator};
use shdl_source::Span;

/// The outcome of running one design through the full pipeline.
pub struct Harness {
    /// The interner every name in `analysis` and `diagnostics` resolves against.
    pub interner: Interner,
    /// `Some` unless flattening itself failed (unknown top, instantiation cycle).
    pub analysis: Option<Analysis>,
    /// Every diagnostic collected across resolution, flattening, and analysis.
    pub diagnostics: Vec<Diagnostic>,
}

impl Harness {
    /// Resolves, flattens, and analyzes `top_name` out of `components`,
    /// treating them as one unnamed module with no imports.
    pub fn build(interner: Interner, top_name: &str, components: Vec<Component>) -> Self {
        let root = interner.get_or_intern("root");
        let top = interner.get_or_intern(top_name);
        let sink = DiagnosticSink::new();

        let mut source = MapModuleSource::new();
        source.insert(root, Module { imports: vec![], components });

        let library = shdl_library::resolve(&source, &interner, &sink, root, Span::DUMMY);
        let netlist = shdl_flatten::flatten_component(top, &library, &interner, &sink);
        let analysis = netlist.map(|n| shdl_analyze::analyze(n, &AnalyzeConfig::default(), &interner, &sink));

        Harness { interner, analysis, diagnostics: sink.diagnostics() }
    }

    /// `true` if any error-severity diagnostic was reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Builds a fresh [`Simulator`] from the analyzed design.
    ///
    /// Panics if flattening failed; callers are expected to have already
    /// checked [`Self::has_errors`] is `false`.
    pub fn simulator(&self) -> Simulator {
        let analysis = self.analysis.as_ref().expect("design flattened successfully");
        Simulator::new(analysis, &self.interner, SimConfig::default())
    }
}

/// A scalar or vector port declaration.
pub fn port(interner: &Interner, name: &str, width: Option<u32>) -> Port {
    Port { name: interner.get_or_intern(name), width, span: Span::DUMMY }
}

/// A reference to a whole component port or instance pin (no index).
pub fn sref(instance: Option<&str>, name: &str) -> SignalRef {
    SignalRef {
        instance: instance.map(TemplatedName::literal),
        name: TemplatedName::literal(name),
        index: IndexSpec::None,
        span: Span::DUMMY,
    }
}

/// A reference to a single 1-based bit of a component port or instance pin.
pub fn sref_bit(instance: Option<&str>, name: &str, bit: i64) -> SignalRef {
    SignalRef {
        instance: instance.map(TemplatedName::literal),
        name: TemplatedName::literal(name),
        index: IndexSpec::Single(ArithExpr::Number(bit)),
        span: Span::DUMMY,
    }
}

/// A subcomponent instance declaration (`name: kind;`).
pub fn instance(name: &str, kind: &str) -> shdl_ast::BodyItem {
    shdl_ast::BodyItem::Instance(shdl_ast::Instance {
        name: TemplatedName::literal(name),
        kind: TemplatedName::literal(kind),
        span: Span::DUMMY,
    })
}

/// A connection statement (`source -> destination;`).
pub fn connection(source: SignalRef, destination: SignalRef) -> shdl_ast::BodyItem {
    shdl_ast::BodyItem::Connection(shdl_ast::Connection { source, destination, span: Span::DUMMY })
}

/// A named constant declaration (`name[width] = value;`).
pub fn constant(name: &str, value: u64, width: Option<u32>) -> shdl_ast::BodyItem {
    shdl_ast::BodyItem::Constant(shdl_ast::Constant { name: TemplatedName::literal(name), value, width, span: Span::DUMMY })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_reports_errors_for_unknown_top() {
        let interner = Interner::new();
        let harness = Harness::build(interner, "NoSuchComponent", vec![]);
        assert!(harness.analysis.is_none());
    }
}
