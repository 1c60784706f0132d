//! The closed set of primitive gate kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive logic gate kind.
///
/// This enumeration is closed by design: the language has exactly six
/// primitives and user components are inlined away entirely by the
/// flattener, so no Base-form netlist ever references anything else.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Two-input AND gate.
    And,
    /// Two-input OR gate.
    Or,
    /// Two-input XOR gate.
    Xor,
    /// Single-input NOT gate.
    Not,
    /// Constant-1 source (no inputs).
    Vcc,
    /// Constant-0 source (no inputs).
    Gnd,
}

impl PrimitiveKind {
    /// All six primitive kinds, in a stable declaration order.
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::And,
        PrimitiveKind::Or,
        PrimitiveKind::Xor,
        PrimitiveKind::Not,
        PrimitiveKind::Vcc,
        PrimitiveKind::Gnd,
    ];

    /// Parses a reserved component-name string into a primitive kind.
    ///
    /// Returns `None` for any name that is not a reserved primitive
    /// identifier (`AND`, `OR`, `XOR`, `NOT`, `__VCC__`, `__GND__`).
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "AND" => Some(PrimitiveKind::And),
            "OR" => Some(PrimitiveKind::Or),
            "XOR" => Some(PrimitiveKind::Xor),
            "NOT" => Some(PrimitiveKind::Not),
            "__VCC__" => Some(PrimitiveKind::Vcc),
            "__GND__" => Some(PrimitiveKind::Gnd),
            _ => None,
        }
    }

    /// Returns the reserved component-name spelling of this primitive.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::And => "AND",
            PrimitiveKind::Or => "OR",
            PrimitiveKind::Xor => "XOR",
            PrimitiveKind::Not => "NOT",
            PrimitiveKind::Vcc => "__VCC__",
            PrimitiveKind::Gnd => "__GND__",
        }
    }

    /// Returns the input port names for this primitive, in declaration order.
    pub fn input_ports(self) -> &'static [&'static str] {
        match self {
            PrimitiveKind::Not => &["A"],
            PrimitiveKind::Vcc | PrimitiveKind::Gnd => &[],
            PrimitiveKind::And | PrimitiveKind::Or | PrimitiveKind::Xor => &["A", "B"],
        }
    }

    /// Returns the output port names for this primitive. Always `["O"]`.
    pub fn output_ports(self) -> &'static [&'static str] {
        &["O"]
    }

    /// Returns `true` if `port` is a valid input pin name for this primitive.
    pub fn has_input(self, port: &str) -> bool {
        self.input_ports().contains(&port)
    }

    /// Evaluates this primitive's truth table given `a` and (for binary gates) `b`.
    ///
    /// Exercised directly by this module's tests to pin down each primitive's
    /// Boolean semantics independent of the packed simulator's bit-parallel
    /// evaluation.
    pub fn eval(self, a: bool, b: bool) -> bool {
        match self {
            PrimitiveKind::And => a & b,
            PrimitiveKind::Or => a | b,
            PrimitiveKind::Xor => a ^ b,
            PrimitiveKind::Not => !a,
            PrimitiveKind::Vcc => true,
            PrimitiveKind::Gnd => false,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_roundtrip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(PrimitiveKind::from_name("HalfAdder"), None);
    }

    #[test]
    fn port_sets() {
        assert_eq!(PrimitiveKind::And.input_ports(), &["A", "B"]);
        assert_eq!(PrimitiveKind::Not.input_ports(), &["A"]);
        assert_eq!(PrimitiveKind::Vcc.input_ports(), &[] as &[&str]);
        assert_eq!(PrimitiveKind::Gnd.output_ports(), &["O"]);
    }

    #[test]
    fn truth_tables() {
        assert!(PrimitiveKind::And.eval(true, true));
        assert!(!PrimitiveKind::And.eval(true, false));
        assert!(PrimitiveKind::Or.eval(true, false));
        assert!(PrimitiveKind::Xor.eval(true, true) == false);
        assert!(!PrimitiveKind::Not.eval(true, false));
        assert!(PrimitiveKind::Vcc.eval(false, false));
        assert!(!PrimitiveKind::Gnd.eval(true, true));
    }
}
