//! Expanded-form component, port, declaration, and connection types.

use serde::{Deserialize, Serialize};
use shdl_common::Ident;
use shdl_source::Span;

use crate::expr::{IndexSpec, RangeSpec, TemplatedName};

/// A port declaration: a name plus an optional vector width.
///
/// `width = None` means a scalar (single-bit) port; `width = Some(w)` means
/// a `w`-bit vector indexed `1..=w`, bit 1 being the least significant bit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Port {
    /// Port name.
    pub name: Ident,
    /// Vector width, or `None` for a scalar port.
    pub width: Option<u32>,
    /// Declaration source location.
    pub span: Span,
}

impl Port {
    /// The number of bits in this port (1 for scalar ports).
    pub fn bit_count(&self) -> u32 {
        self.width.unwrap_or(1)
    }

    /// `true` if this port is a multi-bit vector.
    pub fn is_vector(&self) -> bool {
        self.width.is_some()
    }
}

/// A subcomponent instance declaration (`name: kind;`).
///
/// `kind` names either a primitive (`AND`, `OR`, ...) or a user component;
/// resolving which is the library's job, not the AST's.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Instance {
    /// The instance's local name (possibly templated inside a generator).
    pub name: TemplatedName,
    /// The referenced component or primitive kind name.
    pub kind: TemplatedName,
    /// Declaration source location.
    pub span: Span,
}

/// A named constant declaration (`NAME[width] = value;`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Constant {
    /// The constant's name (possibly templated inside a generator).
    pub name: TemplatedName,
    /// The unsigned integer value.
    pub value: u64,
    /// Explicit bit width, or `None` to infer the minimum width that fits `value`.
    pub width: Option<u32>,
    /// Declaration source location.
    pub span: Span,
}

impl Constant {
    /// The effective width: explicit if given, else the minimum needed to
    /// hold `value` (at least 1 bit).
    pub fn effective_width(&self) -> u32 {
        match self.width {
            Some(w) => w,
            None => {
                let bits = 64 - self.value.leading_zeros();
                bits.max(1)
            }
        }
    }

    /// `true` if bit `i` (1-based) of the constant's value is set.
    pub fn bit(&self, i: u32) -> bool {
        debug_assert!(i >= 1);
        (self.value >> (i - 1)) & 1 != 0
    }
}

/// A reference to a signal: a component port or an instance port, optionally
/// indexed or sliced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignalRef {
    /// `Some(instance_name)` for an instance-port reference (`inst.port`);
    /// `None` for a component-port reference.
    pub instance: Option<TemplatedName>,
    /// The port name (component port) or pin name (`A`, `B`, `O`) referenced.
    pub name: TemplatedName,
    /// The index or slice applied to this reference, if any.
    pub index: IndexSpec,
    /// Reference source location.
    pub span: Span,
}

impl SignalRef {
    /// `true` if this reference names a component port (not an instance pin).
    pub fn is_component_port(&self) -> bool {
        self.instance.is_none()
    }
}

/// A single connection statement (`source -> destination;`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Connection {
    /// The driving endpoint.
    pub source: SignalRef,
    /// The driven endpoint.
    pub destination: SignalRef,
    /// Statement source location.
    pub span: Span,
}

/// A generator loop (`>var[range]{ body }`), valid both among declarations
/// and among connect-block statements.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Generator {
    /// The loop variable, bound to each value in `range` in turn.
    pub var: Ident,
    /// The closed integer range iterated.
    pub range: RangeSpec,
    /// The body, containing further declarations, connections, or nested generators.
    pub body: Vec<BodyItem>,
    /// Declaration source location.
    pub span: Span,
}

/// One item inside a generator body or a component's top-level lists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BodyItem {
    /// A subcomponent instance declaration.
    Instance(Instance),
    /// A named constant declaration.
    Constant(Constant),
    /// A connection statement.
    Connection(Connection),
    /// A nested generator.
    Generator(Generator),
}

/// A complete Expanded-form component definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Component {
    /// The component's name.
    pub name: Ident,
    /// Input ports, in declaration order.
    pub inputs: Vec<Port>,
    /// Output ports, in declaration order.
    pub outputs: Vec<Port>,
    /// The declaration list: instances, constants, and generators, in
    /// declaration order (generators here may only yield further
    /// instances/constants/generators, never connections).
    pub decls: Vec<BodyItem>,
    /// The connect-block: connections and generators, in declaration order.
    pub connect: Vec<BodyItem>,
    /// Declaration source location.
    pub span: Span,
}

impl Component {
    /// Iterates over both input and output ports, inputs first.
    pub fn all_ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Looks up a port by interned name.
    pub fn port(&self, name: Ident) -> Option<&Port> {
        self.all_ports().find(|p| p.name == name)
    }
}

/// A named import (`use module_name :: { Name1, Name2 };`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Import {
    /// The imported module's name.
    pub module_name: Ident,
    /// The component names requested from that module.
    pub names: Vec<Ident>,
    /// Statement source location.
    pub span: Span,
}

/// A parsed source file: zero or more imports followed by zero or more
/// component definitions.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Module {
    /// Imports declared at the top of the file.
    pub imports: Vec<Import>,
    /// Components defined in this file.
    pub components: Vec<Component>,
}

impl Module {
    /// Looks up a component defined directly in this module by interned name.
    pub fn component(&self, name: Ident) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_bit_count() {
        let scalar = Port {
            name: Ident::from_raw(0),
            width: None,
            span: Span::DUMMY,
        };
        let vector = Port {
            name: Ident::from_raw(1),
            width: Some(8),
            span: Span::DUMMY,
        };
        assert_eq!(scalar.bit_count(), 1);
        assert!(!scalar.is_vector());
        assert_eq!(vector.bit_count(), 8);
        assert!(vector.is_vector());
    }

    #[test]
    fn constant_effective_width_inferred() {
        let c = Constant {
            name: TemplatedName::literal("Hundred"),
            value: 100,
            width: None,
            span: Span::DUMMY,
        };
        // 100 = 0b1100100, needs 7 bits
        assert_eq!(c.effective_width(), 7);
    }

    #[test]
    fn constant_effective_width_explicit() {
        let c = Constant {
            name: TemplatedName::literal("Zero"),
            value: 0,
            width: Some(4),
            span: Span::DUMMY,
        };
        assert_eq!(c.effective_width(), 4);
    }

    #[test]
    fn constant_bit_extraction() {
        let c = Constant {
            name: TemplatedName::literal("Hundred"),
            value: 0b1100100,
            width: Some(7),
            span: Span::DUMMY,
        };
        assert!(!c.bit(1));
        assert!(!c.bit(2));
        assert!(c.bit(3));
        assert!(c.bit(7));
    }
}
