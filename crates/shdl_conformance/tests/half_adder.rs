//! Half adder: the smallest possible design, `Sum = A XOR B`, `Carry = A AND B`.

use shdl_ast::Component;
use shdl_common::Interner;
use shdl_conformance::{connection, instance, port, sref, Harness};
use shdl_source::Span;

fn half_adder(interner: &Interner) -> Component {
    Component {
        name: interner.get_or_intern("HalfAdder"),
        inputs: vec![port(interner, "A", None), port(interner, "B", None)],
        outputs: vec![port(interner, "Sum", None), port(interner, "Carry", None)],
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
    }
}

#[test]
fn truth_table_holds_for_every_input_combination() {
    for a in [0u64, 1] {
        for b in [0u64, 1] {
            let interner = Interner::new();
            let component = half_adder(&interner);
            let harness = Harness::build(interner, "HalfAdder", vec![component]);
            assert!(!harness.has_errors(), "{:?}", harness.diagnostics);

            let mut sim = harness.simulator();
            sim.poke("A", a);
            sim.poke("B", b);
            sim.step(1);

            assert_eq!(sim.peek("Sum"), a ^ b, "Sum for A={a} B={b}");
            assert_eq!(sim.peek("Carry"), a & b, "Carry for A={a} B={b}");
        }
    }
}

#[test]
fn two_gates_survive_flattening() {
    let interner = Interner::new();
    let component = half_adder(&interner);
    let harness = Harness::build(interner, "HalfAdder", vec![component]);
    assert_eq!(harness.analysis.as_ref().unwrap().netlist.gates.len(), 2);
}
