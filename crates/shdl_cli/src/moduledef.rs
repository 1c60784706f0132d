//! JSON input format for the CLI harness.
//!
//! `shdl_ast::Module` itself cannot be deserialized standalone: its names
//! are already-interned [`shdl_common::Ident`]s, valid only against the
//! particular [`Interner`] that produced them. This module defines a
//! plain-string mirror of the subset of the Expanded-form AST this harness
//! accepts — one module, no imports, no generators, no templated names —
//! and interns it into a real [`shdl_ast::Module`] on load. A design that
//! needs generators or hierarchy composed from multiple files is out of
//! scope for this harness; build it with the library APIs directly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use shdl_ast::{
    BodyItem, Component, Connection, Constant, IndexSpec, Instance, Module, Port, SignalRef, TemplatedName,
};
use shdl_common::{Ident, Interner};
use shdl_library::{ModuleSource, ModuleSourceError};
use shdl_source::Span;

/// A port declaration: a name plus an optional vector width.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortDef {
    /// Port name.
    pub name: String,
    /// Vector width, or omitted for a scalar port.
    #[serde(default)]
    pub width: Option<u32>,
}

/// A subcomponent instance (`name: kind;`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstanceDef {
    /// The instance's local name.
    pub name: String,
    /// The primitive (`AND`, `OR`, `XOR`, `NOT`) or user component name.
    pub kind: String,
}

/// A named constant (`NAME[width] = value;`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstantDef {
    /// The constant's name.
    pub name: String,
    /// The unsigned integer value.
    pub value: u64,
    /// Explicit bit width, or omitted to infer the minimum width.
    #[serde(default)]
    pub width: Option<u32>,
}

/// Which bit(s) of a referenced signal a [`SignalRefDef`] selects.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexDef {
    /// The whole signal (a scalar port, or a vector's full width).
    None,
    /// A single bit, 1-based.
    Bit {
        /// 1-based bit index.
        bit: i64,
    },
    /// An inclusive slice `[low:high]`, 1-based; either bound may be
    /// omitted to bind to the referenced port's natural bounds.
    Slice {
        /// Lower bound, inclusive.
        #[serde(default)]
        low: Option<i64>,
        /// Upper bound, inclusive.
        #[serde(default)]
        high: Option<i64>,
    },
}

/// A reference to a signal: a component port or an instance port.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignalRefDef {
    /// `Some(instance_name)` for an instance-port reference (`inst.port`);
    /// omitted for a component-port reference.
    #[serde(default)]
    pub instance: Option<String>,
    /// The port name (component port) or pin name (`A`, `B`, `O`) referenced.
    pub name: String,
    /// The index or slice applied to this reference.
    #[serde(default = "default_index")]
    pub index: IndexDef,
}

fn default_index() -> IndexDef {
    IndexDef::None
}

/// A single connection statement (`source -> destination;`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionDef {
    /// The driving endpoint.
    pub source: SignalRefDef,
    /// The driven endpoint.
    pub destination: SignalRefDef,
}

/// One component definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentDef {
    /// The component's name.
    pub name: String,
    /// Input ports, in declaration order.
    #[serde(default)]
    pub inputs: Vec<PortDef>,
    /// Output ports, in declaration order.
    #[serde(default)]
    pub outputs: Vec<PortDef>,
    /// Subcomponent instances.
    #[serde(default)]
    pub instances: Vec<InstanceDef>,
    /// Named constants.
    #[serde(default)]
    pub constants: Vec<ConstantDef>,
    /// Connections.
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
}

/// A whole single-file design: one or more component definitions, no
/// imports.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModuleDef {
    /// Component definitions, in any order.
    pub components: Vec<ComponentDef>,
}

impl ModuleDef {
    /// Parses a `ModuleDef` from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Interns this definition into a real [`Module`], ready to be handed
    /// to [`shdl_library::resolve`].
    pub fn into_module(self, interner: &Interner) -> Module {
        Module { imports: Vec::new(), components: self.components.into_iter().map(|c| c.intern(interner)).collect() }
    }
}

impl ComponentDef {
    fn intern(self, interner: &Interner) -> Component {
        Component {
            name: interner.get_or_intern(&self.name),
            inputs: self.inputs.into_iter().map(|p| p.intern(interner)).collect(),
            outputs: self.outputs.into_iter().map(|p| p.intern(interner)).collect(),
            decls: self
                .instances
                .into_iter()
                .map(|i| BodyItem::Instance(i.intern(interner)))
                .chain(self.constants.into_iter().map(|c| BodyItem::Constant(c.intern(interner))))
                .collect(),
            connect: self.connections.into_iter().map(|c| BodyItem::Connection(c.intern(interner))).collect(),
            span: Span::DUMMY,
        }
    }
}

impl PortDef {
    fn intern(self, interner: &Interner) -> Port {
        Port { name: interner.get_or_intern(&self.name), width: self.width, span: Span::DUMMY }
    }
}

impl InstanceDef {
    fn intern(self, _interner: &Interner) -> Instance {
        Instance { name: TemplatedName::literal(self.name), kind: TemplatedName::literal(self.kind), span: Span::DUMMY }
    }
}

impl ConstantDef {
    fn intern(self, _interner: &Interner) -> Constant {
        Constant { name: TemplatedName::literal(self.name), value: self.value, width: self.width, span: Span::DUMMY }
    }
}

impl ConnectionDef {
    fn intern(self, interner: &Interner) -> Connection {
        Connection { source: self.source.intern(interner), destination: self.destination.intern(interner), span: Span::DUMMY }
    }
}

impl SignalRefDef {
    fn intern(self, _interner: &Interner) -> SignalRef {
        SignalRef {
            instance: self.instance.map(TemplatedName::literal),
            name: TemplatedName::literal(self.name),
            index: self.index.intern(),
            span: Span::DUMMY,
        }
    }
}

impl IndexDef {
    fn intern(self) -> IndexSpec {
        use shdl_ast::ArithExpr;
        match self {
            IndexDef::None => IndexSpec::None,
            IndexDef::Bit { bit } => IndexSpec::Single(ArithExpr::Number(bit)),
            IndexDef::Slice { low, high } => IndexSpec::Slice {
                low: low.map(ArithExpr::Number),
                high: high.map(ArithExpr::Number),
            },
        }
    }
}

/// A filesystem-backed [`ModuleSource`]: resolves a module name to
/// `<module_name>.json` in a configured list of search directories, first
/// match wins, and interns the result against a shared [`Interner`].
///
/// This stands in for the textual `.shdl` file lookup described in §4.1 of
/// the design this crate descends from; reading and tokenizing `.shdl`
/// source is the external parser's job, out of scope here. `JsonModuleSource`
/// reads [`ModuleDef`]-shaped JSON instead, so this harness can exercise the
/// library/flatten/analyze/sim pipeline without one.
pub struct JsonModuleSource<'a> {
    search_paths: Vec<PathBuf>,
    interner: &'a Interner,
}

impl<'a> JsonModuleSource<'a> {
    /// Creates a source that searches `search_paths` in order.
    pub fn new(search_paths: Vec<PathBuf>, interner: &'a Interner) -> Self {
        Self { search_paths, interner }
    }
}

impl ModuleSource for JsonModuleSource<'_> {
    fn load(&self, module_name: Ident) -> Result<Module, ModuleSourceError> {
        let name = self.interner.resolve(module_name);
        let file_name = format!("{name}.json");
        for dir in &self.search_paths {
            let path = dir.join(&file_name);
            let Ok(text) = std::fs::read_to_string(&path) else {
                continue;
            };
            let def = ModuleDef::from_json(&text).map_err(|_| ModuleSourceError::NotFound)?;
            return Ok(def.into_module(self.interner));
        }
        Err(ModuleSourceError::NotFound)
    }
}
