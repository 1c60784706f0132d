//! Bit-level connection endpoints in Base form.
//!
//! Expanded form lets a [`SignalRef`](shdl_ast::SignalRef) name a whole
//! vector or a slice of one; by the time flattening is done every such
//! reference has been expanded into individual single-bit connections, so
//! Base form only ever needs to name one bit of one port.

use serde::{Deserialize, Serialize};
use shdl_common::Ident;
use shdl_source::Span;

use crate::ids::GateId;

/// Which pin of a gate a connection attaches to.
///
/// Binary gates (`AND`/`OR`/`XOR`) use `A` and `B` for inputs; `NOT` uses
/// only `A`; `VCC`/`GND` have no inputs. Every primitive's sole output is
/// named `O`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Pin {
    /// First (or only) input.
    A,
    /// Second input, binary gates only.
    B,
    /// The single output.
    O,
}

impl Pin {
    /// Parses a primitive pin name (`"A"`, `"B"`, `"O"`).
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Pin::A),
            "B" => Some(Pin::B),
            "O" => Some(Pin::O),
            _ => None,
        }
    }

    /// The pin's canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Pin::A => "A",
            Pin::B => "B",
            Pin::O => "O",
        }
    }
}

/// One bit of one signal: either a single bit of a component port, or a pin
/// of a gate instance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Endpoint {
    /// Bit `bit` (1-based) of the component port named `port`.
    Port {
        /// The component port's interned name.
        port: Ident,
        /// The 1-based bit index within that port.
        bit: u32,
    },
    /// The pin `pin` of gate instance `gate`.
    Gate {
        /// The gate instance.
        gate: GateId,
        /// The pin of that gate.
        pin: Pin,
    },
}

/// A single-bit connection from a driving [`Endpoint`] to a driven one.
///
/// Every connection in a flattened [`Netlist`](crate::netlist::Netlist) is
/// exactly one bit wide; this is what the slice-expansion flattening phase
/// exists to guarantee.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Connection {
    /// The driving endpoint (a gate's `O` pin, or a component input-port bit).
    pub source: Endpoint,
    /// The driven endpoint (a gate's `A`/`B` pin, or a component output-port bit).
    pub destination: Endpoint,
    /// Source location of the original connection statement, for diagnostics.
    pub span: Span,
}
