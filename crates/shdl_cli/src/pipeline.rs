//! The compile pipeline this harness drives: library resolution, flattening,
//! and analysis, in the fixed order §2 describes. A thin wrapper over
//! `shdl_library` + `shdl_flatten` + `shdl_analyze`; nothing here could not
//! be called directly by an embedding host instead of through this binary.

use shdl_analyze::{Analysis, AnalyzeConfig};
use shdl_common::{Ident, Interner};
use shdl_diagnostics::DiagnosticSink;
use shdl_library::ModuleSource;
use shdl_source::Span;

use crate::config::CompileConfig;

/// Runs library resolution, flattening, and analysis for `top_component` in
/// `root_module`, stopping early if `compile_config.fail_fast` is set and an
/// earlier stage already reported an error.
///
/// Returns `None` if any stage failed to produce a netlist worth analyzing
/// (an unresolved top component, an instantiation cycle, ...); every
/// diagnostic explaining why is already in `sink`. A `Some` result is not by
/// itself a guarantee of a simulator-ready design — the caller still checks
/// `sink.has_errors()`, same as calling these crates directly would require.
pub fn compile(
    source: &dyn ModuleSource,
    interner: &Interner,
    sink: &DiagnosticSink,
    root_module: Ident,
    top_component: Ident,
    compile_config: &CompileConfig,
    analyze_config: &AnalyzeConfig,
) -> Option<Analysis> {
    let library = shdl_library::resolve(source, interner, sink, root_module, Span::DUMMY);
    if compile_config.fail_fast && sink.has_errors() {
        return None;
    }

    let netlist = shdl_flatten::flatten_component(top_component, &library, interner, sink)?;
    if compile_config.fail_fast && sink.has_errors() {
        return None;
    }

    Some(shdl_analyze::analyze(netlist, analyze_config, interner, sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shdl_ast::{
        BodyItem, Component, Connection, IndexSpec, Instance, Module, Port, SignalRef, TemplatedName,
    };
    use shdl_library::MapModuleSource;

    fn port(interner: &Interner, name: &str) -> Port {
        Port { name: interner.get_or_intern(name), width: None, span: Span::DUMMY }
    }

    fn sref(instance: Option<&str>, name: &str) -> SignalRef {
        SignalRef {
            instance: instance.map(TemplatedName::literal),
            name: TemplatedName::literal(name),
            index: IndexSpec::Single(shdl_ast::ArithExpr::Number(1)),
            span: Span::DUMMY,
        }
    }

    fn instance(name: &str, kind: &str) -> BodyItem {
        BodyItem::Instance(Instance {
            name: TemplatedName::literal(name),
            kind: TemplatedName::literal(kind),
            span: Span::DUMMY,
        })
    }

    fn connection(src: SignalRef, dst: SignalRef) -> BodyItem {
        BodyItem::Connection(Connection { source: src, destination: dst, span: Span::DUMMY })
    }

    #[test]
    fn compiles_half_adder_end_to_end() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let half_adder = Component {
            name: interner.get_or_intern("HalfAdder"),
            inputs: vec![port(&interner, "A"), port(&interner, "B")],
            outputs: vec![port(&interner, "Sum"), port(&interner, "Carry")],
            decls: vec![instance("x1", "XOR"), instance("a1", "AND")],
            connect: vec![
                connection(sref(None, "A"), sref(Some("x1"), "A")),
                connection(sref(None, "B"), sref(Some("x1"), "B")),
                connection(sref(None, "A"), sref(Some("a1"), "A")),
                connection(sref(None, "B"), sref(Some("a1"), "B")),
                connection(sref(Some("x1"), "O"), sref(None, "Sum")),
                connection(sref(Some("a1"), "O"), sref(None, "Carry")),
            ],
            span: Span::DUMMY,
        };
        let root = interner.get_or_intern("root");
        let top = half_adder.name;
        let mut source = MapModuleSource::new();
        source.insert(root, Module { imports: vec![], components: vec![half_adder] });

        let analysis = compile(
            &source,
            &interner,
            &sink,
            root,
            top,
            &CompileConfig::default(),
            &AnalyzeConfig::default(),
        )
        .expect("compiles");
        assert!(!sink.has_errors());
        assert_eq!(analysis.netlist.gates.len(), 2);
    }

    #[test]
    fn unknown_top_component_yields_none() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let root = interner.get_or_intern("root");
        let mut source = MapModuleSource::new();
        source.insert(root, Module::default());
        let missing = interner.get_or_intern("NoSuchTop");

        let result = compile(
            &source,
            &interner,
            &sink,
            root,
            missing,
            &CompileConfig::default(),
            &AnalyzeConfig::default(),
        );
        assert!(result.is_none());
    }
}
