//! Phase 4: hierarchy inlining.
//!
//! Recursively resolves every user-component instance in a component's
//! declaration list, flattens it first (memoized by component name), and
//! splices its gates and connections into the parent, renaming every
//! spliced gate with the instantiating name as a prefix. What remains after
//! this phase is a single flat [`Netlist`] per originally-defined component,
//! containing only primitive gate instances.

use std::collections::HashMap;

use shdl_ast::{ArithExpr, BodyItem, Component, IndexSpec, Instance, PrimitiveKind, SignalRef};
use shdl_common::{Ident, Interner};
use shdl_diagnostics::DiagnosticSink;
use shdl_ir::{Arena, Connection as IrConnection, Endpoint, Gate, GateId, Netlist, Pin};
use shdl_library::{Resolution, ResolvedLibrary};
use shdl_source::Span;

use crate::{constants, env::Env, errors, generators, slices};

/// Caches flattened netlists across a whole flattening run so that a
/// component instantiated many times (e.g. a one-bit adder inside a
/// ripple-carry chain) is only flattened once.
#[derive(Default)]
pub struct FlattenCache {
    netlists: HashMap<Ident, Netlist>,
}

impl FlattenCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Flattens `root` (and everything it transitively instantiates) into a
/// single `Netlist`, or `None` if an unrecoverable error was reported to
/// `sink` (an unknown component, or an instantiation cycle).
pub fn flatten(
    root: Ident,
    library: &ResolvedLibrary,
    interner: &Interner,
    sink: &DiagnosticSink,
    cache: &mut FlattenCache,
) -> Option<Netlist> {
    let mut stack = Vec::new();
    flatten_component(root, library, interner, sink, cache, &mut stack)
}

/// What a local instance resolved to, once its own subcomponent (if any)
/// has been flattened and spliced into the parent arena.
enum InstanceKind {
    Primitive(PrimitiveKind, GateId),
    Child {
        /// `(output port, bit) -> driver`, already remapped into the
        /// parent's gate arena.
        output_driver: HashMap<(String, u32), BoundaryDriver>,
        /// `(input port, bit) -> internal destinations`, already remapped.
        input_consumers: HashMap<(String, u32), Vec<(GateId, Pin)>>,
    },
}

/// What drives one bit of a flattened child's output port.
enum BoundaryDriver {
    /// Driven by a gate now living in the parent's arena.
    Gate(GateId),
    /// A wire-through: the output is driven directly by one of the child's
    /// own input bits, whose driver is only known in the parent's own
    /// connect-block.
    WireThrough(String, u32),
}

fn flatten_component(
    name: Ident,
    library: &ResolvedLibrary,
    interner: &Interner,
    sink: &DiagnosticSink,
    cache: &mut FlattenCache,
    stack: &mut Vec<Ident>,
) -> Option<Netlist> {
    if let Some(netlist) = cache.netlists.get(&name) {
        return Some(netlist.clone());
    }
    if stack.contains(&name) {
        sink.emit(errors::error_recursive_component(interner.resolve(name), Span::DUMMY));
        return None;
    }
    let component = library.component(name)?;
    stack.push(name);

    let env = Env::new();
    let bound: std::collections::HashSet<Ident> = Default::default();
    let decls1 = generators::expand(&component.decls, &env, &bound, interner, sink);
    let connect1 = generators::expand(&component.connect, &env, &bound, interner, sink);
    let connect2 = slices::expand(&connect1, component, &decls1, library, interner, sink);
    let (decls2, connect3) = constants::expand(&decls1, &connect2);

    let mut gates: Arena<GateId, Gate> = Arena::new();
    let mut spliced_connections: Vec<IrConnection> = Vec::new();
    let mut instances: HashMap<String, InstanceKind> = HashMap::new();

    for item in &decls2 {
        let BodyItem::Instance(inst) = item else {
            continue;
        };
        process_instance(
            inst,
            library,
            interner,
            sink,
            cache,
            stack,
            &mut gates,
            &mut spliced_connections,
            &mut instances,
        );
    }

    stack.pop();

    let dest_source = build_dest_source(&connect3);
    let mut memo: HashMap<Key, Endpoint> = HashMap::new();
    let mut visiting: std::collections::HashSet<Key> = std::collections::HashSet::new();

    let mut connections = spliced_connections;
    for item in &connect3 {
        let BodyItem::Connection(c) = item else {
            continue;
        };
        let dst_key = sig_key(&c.destination);
        let src_key = sig_key(&c.source);
        match &dst_key.0 {
            None => {
                let Some(src) = resolve(&src_key, &instances, &dest_source, interner, &mut memo, &mut visiting) else {
                    continue;
                };
                connections.push(IrConnection {
                    source: src,
                    destination: Endpoint::Port {
                        port: interner.get_or_intern(&dst_key.1),
                        bit: dst_key.2,
                    },
                    span: c.span,
                });
            }
            Some(inst_name) => match instances.get(inst_name) {
                Some(InstanceKind::Primitive(_, gid)) => {
                    let Some(pin) = Pin::from_name(&dst_key.1) else {
                        continue;
                    };
                    let Some(src) = resolve(&src_key, &instances, &dest_source, interner, &mut memo, &mut visiting)
                    else {
                        continue;
                    };
                    connections.push(IrConnection {
                        source: src,
                        destination: Endpoint::Gate { gate: *gid, pin },
                        span: c.span,
                    });
                }
                Some(InstanceKind::Child { input_consumers, .. }) => {
                    let Some(consumers) = input_consumers.get(&(dst_key.1.clone(), dst_key.2)) else {
                        continue;
                    };
                    let Some(src) = resolve(&src_key, &instances, &dest_source, interner, &mut memo, &mut visiting)
                    else {
                        continue;
                    };
                    for (gid, pin) in consumers {
                        connections.push(IrConnection {
                            source: src,
                            destination: Endpoint::Gate { gate: *gid, pin: *pin },
                            span: c.span,
                        });
                    }
                }
                None => continue,
            },
        }
    }

    let netlist = Netlist {
        name,
        inputs: component.inputs.clone(),
        outputs: component.outputs.clone(),
        gates,
        connections,
        span: component.span,
    };
    cache.netlists.insert(name, netlist.clone());
    Some(netlist)
}

#[allow(clippy::too_many_arguments)]
fn process_instance(
    inst: &Instance,
    library: &ResolvedLibrary,
    interner: &Interner,
    sink: &DiagnosticSink,
    cache: &mut FlattenCache,
    stack: &mut Vec<Ident>,
    gates: &mut Arena<GateId, Gate>,
    spliced_connections: &mut Vec<IrConnection>,
    instances: &mut HashMap<String, InstanceKind>,
) {
    let Some(inst_name) = inst.name.as_literal() else {
        return;
    };
    let Some(kind_name) = inst.kind.as_literal() else {
        return;
    };
    let kind_ident = interner.get_or_intern(kind_name);

    match library.lookup(kind_ident, interner) {
        Some(Resolution::Primitive(prim)) => {
            let gid = gates.alloc(Gate {
                name: interner.get_or_intern(inst_name),
                kind: prim,
                span: inst.span,
            });
            instances.insert(inst_name.to_string(), InstanceKind::Primitive(prim, gid));
        }
        Some(Resolution::Component(_)) => {
            let Some(child) = flatten_component(kind_ident, library, interner, sink, cache, stack) else {
                return;
            };
            let mut remap: HashMap<GateId, GateId> = HashMap::new();
            for (gid, gate) in child.gates.iter() {
                let new_name = format!("{inst_name}_{}", interner.resolve(gate.name));
                let new_id = gates.alloc(Gate {
                    name: interner.get_or_intern(&new_name),
                    kind: gate.kind,
                    span: gate.span,
                });
                remap.insert(gid, new_id);
            }

            let mut output_driver = HashMap::new();
            let mut input_consumers: HashMap<(String, u32), Vec<(GateId, Pin)>> = HashMap::new();

            for conn in &child.connections {
                match (conn.source, conn.destination) {
                    (Endpoint::Gate { gate: sg, pin: Pin::O }, Endpoint::Gate { gate: dg, pin: dpin }) => {
                        spliced_connections.push(IrConnection {
                            source: Endpoint::Gate { gate: remap[&sg], pin: Pin::O },
                            destination: Endpoint::Gate { gate: remap[&dg], pin: dpin },
                            span: conn.span,
                        });
                    }
                    (Endpoint::Gate { gate: sg, pin: Pin::O }, Endpoint::Port { port, bit }) => {
                        output_driver
                            .insert((interner.resolve(port).to_string(), bit), BoundaryDriver::Gate(remap[&sg]));
                    }
                    (Endpoint::Port { port: in_port, bit: in_bit }, Endpoint::Gate { gate: dg, pin: dpin }) => {
                        input_consumers
                            .entry((interner.resolve(in_port).to_string(), in_bit))
                            .or_default()
                            .push((remap[&dg], dpin));
                    }
                    (Endpoint::Port { port: in_port, bit: in_bit }, Endpoint::Port { port: out_port, bit: out_bit }) => {
                        output_driver.insert(
                            (interner.resolve(out_port).to_string(), out_bit),
                            BoundaryDriver::WireThrough(interner.resolve(in_port).to_string(), in_bit),
                        );
                    }
                    // A gate's A/B input is never a source and a component's own
                    // input port is never a destination for a second time here.
                    (Endpoint::Gate { pin: Pin::A | Pin::B, .. }, _) => {}
                }
            }

            instances.insert(
                inst_name.to_string(),
                InstanceKind::Child { output_driver, input_consumers },
            );
        }
        None => {
            // Unknown component/primitive kind: already reported wherever the
            // connect-block tries to use this instance, nothing further to do.
        }
    }
}

/// `(instance name, port/pin name, 1-based bit)`.
type Key = (Option<String>, String, u32);

fn sig_key(r: &SignalRef) -> Key {
    let instance = r.instance.as_ref().and_then(|n| n.as_literal()).map(str::to_string);
    let name = r.name.as_literal().unwrap_or_default().to_string();
    let bit = match &r.index {
        IndexSpec::Single(ArithExpr::Number(n)) => *n as u32,
        _ => 1,
    };
    (instance, name, bit)
}

fn build_dest_source(connect: &[BodyItem]) -> HashMap<Key, SignalRef> {
    let mut map = HashMap::new();
    for item in connect {
        if let BodyItem::Connection(c) = item {
            map.insert(sig_key(&c.destination), c.source.clone());
        }
    }
    map
}

fn resolve(
    key: &Key,
    instances: &HashMap<String, InstanceKind>,
    dest_source: &HashMap<Key, SignalRef>,
    interner: &Interner,
    memo: &mut HashMap<Key, Endpoint>,
    visiting: &mut std::collections::HashSet<Key>,
) -> Option<Endpoint> {
    if let Some(ep) = memo.get(key) {
        return Some(*ep);
    }
    if !visiting.insert(key.clone()) {
        // A combinational loop at the instance-boundary level: leave it
        // undriven here rather than hang. The packed simulator settles
        // gate-level feedback loops over successive `step` calls; this
        // path only matters for resolving wire-through chains, which do
        // not themselves form cycles in any well-formed design.
        return None;
    }

    let (inst_opt, port, bit) = key;
    let endpoint = match inst_opt {
        None => Some(Endpoint::Port { port: interner.get_or_intern(port), bit: *bit }),
        Some(inst_name) => match instances.get(inst_name) {
            Some(InstanceKind::Primitive(_, gid)) => Pin::from_name(port).map(|pin| Endpoint::Gate { gate: *gid, pin }),
            Some(InstanceKind::Child { output_driver, .. }) => {
                match output_driver.get(&(port.clone(), *bit)) {
                    Some(BoundaryDriver::Gate(g)) => Some(Endpoint::Gate { gate: *g, pin: Pin::O }),
                    Some(BoundaryDriver::WireThrough(in_port, in_bit)) => {
                        let inner_key = (Some(inst_name.clone()), in_port.clone(), *in_bit);
                        dest_source.get(&inner_key).and_then(|inner_source| {
                            let inner_key2 = sig_key(inner_source);
                            resolve(&inner_key2, instances, dest_source, interner, memo, visiting)
                        })
                    }
                    None => None,
                }
            }
            None => None,
        },
    };

    visiting.remove(key);
    if let Some(ep) = endpoint {
        memo.insert(key.clone(), ep);
    }
    endpoint
}

#[cfg(test)]
mod tests {
    use super::*;
    use shdl_ast::{Connection, Module, Port, TemplatedName};
    use shdl_library::MapModuleSource;

    fn sref(instance: Option<&str>, name: &str, bit: i64) -> SignalRef {
        SignalRef {
            instance: instance.map(TemplatedName::literal),
            name: TemplatedName::literal(name),
            index: IndexSpec::Single(ArithExpr::Number(bit)),
            span: Span::DUMMY,
        }
    }

    fn library_with(interner: &Interner, components: Vec<Component>) -> ResolvedLibrary {
        let sink = DiagnosticSink::new();
        let root = interner.get_or_intern("root");
        let mut source = MapModuleSource::new();
        source.insert(root, Module { imports: vec![], components });
        shdl_library::resolve(&source, interner, &sink, root, Span::DUMMY)
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

    fn port(interner: &Interner, name: &str) -> Port {
        Port { name: interner.get_or_intern(name), width: None, span: Span::DUMMY }
    }

    #[test]
    fn flattens_single_primitive_component() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let half_adder = Component {
            name: interner.get_or_intern("HalfAdder"),
            inputs: vec![port(&interner, "A"), port(&interner, "B")],
            outputs: vec![port(&interner, "Sum"), port(&interner, "Carry")],
            decls: vec![instance("x1", "XOR"), instance("a1", "AND")],
            connect: vec![
                connection(sref(None, "A", 1), sref(Some("x1"), "A", 1)),
                connection(sref(None, "B", 1), sref(Some("x1"), "B", 1)),
                connection(sref(None, "A", 1), sref(Some("a1"), "A", 1)),
                connection(sref(None, "B", 1), sref(Some("a1"), "B", 1)),
                connection(sref(Some("x1"), "O", 1), sref(None, "Sum", 1)),
                connection(sref(Some("a1"), "O", 1), sref(None, "Carry", 1)),
            ],
            span: Span::DUMMY,
        };
        let name = half_adder.name;
        let library = library_with(&interner, vec![half_adder]);
        let mut cache = FlattenCache::new();
        let netlist = flatten(name, &library, &interner, &sink, &mut cache).expect("flattens");
        assert!(!sink.has_errors());
        assert_eq!(netlist.gates.len(), 2);
        assert_eq!(netlist.connections.len(), 6);
    }

    #[test]
    fn inlines_subcomponent_with_renamed_gates() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let inv = Component {
            name: interner.get_or_intern("Inv2"),
            inputs: vec![port(&interner, "A")],
            outputs: vec![port(&interner, "O")],
            decls: vec![instance("n1", "NOT"), instance("n2", "NOT")],
            connect: vec![
                connection(sref(None, "A", 1), sref(Some("n1"), "A", 1)),
                connection(sref(Some("n1"), "O", 1), sref(Some("n2"), "A", 1)),
                connection(sref(Some("n2"), "O", 1), sref(None, "O", 1)),
            ],
            span: Span::DUMMY,
        };
        let top = Component {
            name: interner.get_or_intern("Top"),
            inputs: vec![port(&interner, "A")],
            outputs: vec![port(&interner, "O")],
            decls: vec![instance("buf1", "Inv2")],
            connect: vec![
                connection(sref(None, "A", 1), sref(Some("buf1"), "A", 1)),
                connection(sref(Some("buf1"), "O", 1), sref(None, "O", 1)),
            ],
            span: Span::DUMMY,
        };
        let top_name = top.name;
        let library = library_with(&interner, vec![inv, top]);
        let mut cache = FlattenCache::new();
        let netlist = flatten(top_name, &library, &interner, &sink, &mut cache).expect("flattens");
        assert!(!sink.has_errors());
        assert_eq!(netlist.gates.len(), 2);
        let names: Vec<&str> = netlist.gates.values().map(|g| interner.resolve(g.name)).collect();
        assert!(names.contains(&"buf1_n1"));
        assert!(names.contains(&"buf1_n2"));
        // The gate-to-gate link inside the inlined child survives.
        assert!(netlist.connections.iter().any(|c| matches!(
            (c.source, c.destination),
            (Endpoint::Gate { pin: Pin::O, .. }, Endpoint::Gate { pin: Pin::A, .. })
        )));
    }

    #[test]
    fn wire_through_resolves_to_external_source() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let passthrough = Component {
            name: interner.get_or_intern("Pass"),
            inputs: vec![port(&interner, "A")],
            outputs: vec![port(&interner, "O")],
            decls: vec![],
            connect: vec![connection(sref(None, "A", 1), sref(None, "O", 1))],
            span: Span::DUMMY,
        };
        let top = Component {
            name: interner.get_or_intern("Top"),
            inputs: vec![port(&interner, "A")],
            outputs: vec![port(&interner, "O")],
            decls: vec![instance("g1", "NOT"), instance("p1", "Pass")],
            connect: vec![
                connection(sref(None, "A", 1), sref(Some("g1"), "A", 1)),
                connection(sref(Some("g1"), "O", 1), sref(Some("p1"), "A", 1)),
                connection(sref(Some("p1"), "O", 1), sref(None, "O", 1)),
            ],
            span: Span::DUMMY,
        };
        let top_name = top.name;
        let library = library_with(&interner, vec![passthrough, top]);
        let mut cache = FlattenCache::new();
        let netlist = flatten(top_name, &library, &interner, &sink, &mut cache).expect("flattens");
        assert!(!sink.has_errors());
        // Pass contributes no gates; the NOT drives O directly.
        assert_eq!(netlist.gates.len(), 1);
        assert!(netlist.connections.iter().any(|c| matches!(
            (c.source, c.destination),
            (Endpoint::Gate { pin: Pin::O, .. }, Endpoint::Port { .. })
        )));
    }

    #[test]
    fn recursive_component_reports_error() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let name = interner.get_or_intern("Ring");
        let ring = Component {
            name,
            inputs: vec![],
            outputs: vec![],
            decls: vec![instance("inner", "Ring")],
            connect: vec![],
            span: Span::DUMMY,
        };
        let library = library_with(&interner, vec![ring]);
        let mut cache = FlattenCache::new();
        let result = flatten(name, &library, &interner, &sink, &mut cache);
        assert!(result.is_none());
        assert!(sink.has_errors());
    }
}
