//! A single primitive gate instance in Base form.

use serde::{Deserialize, Serialize};
use shdl_ast::PrimitiveKind;
use shdl_common::Ident;
use shdl_source::Span;

/// One primitive instance in a flattened netlist.
///
/// By the time a [`Netlist`](crate::netlist::Netlist) exists, every instance
/// in the original Expanded-form tree has been either inlined away (user
/// components) or reduced to one of these six kinds — there is no notion of
/// a "user component instance" left at all.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Gate {
    /// The gate's fully-qualified instance name, e.g. `adder0$sum1$xor2`
    /// after hierarchy inlining has prefixed it with its ancestry.
    pub name: Ident,
    /// Which of the six primitives this instance is.
    pub kind: PrimitiveKind,
    /// The source location of the declaration this gate was materialized
    /// from (an instance, or a constant for `VCC`/`GND` gates).
    pub span: Span,
}
