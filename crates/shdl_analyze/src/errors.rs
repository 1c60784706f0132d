//! Diagnostic codes and helper constructors for analysis errors.
//!
//! `E400`-`E402` cover structural problems the analyzer alone can see once a
//! netlist is fully flat: duplicate names, malformed connection endpoints,
//! and conflicting or absent drivers. `W200`-`W203` are the four
//! unused-declaration and structural warnings the analyzer computes from the
//! same resolved connection data.

use shdl_diagnostics::{Category, Diagnostic, DiagnosticCode, Label};
use shdl_source::Span;

/// Two gates or ports in the same netlist share a name.
pub const E400: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 400,
};

/// A connection endpoint references a port or pin that cannot carry the
/// role (input/output, or wrong pin for the gate's kind) it was used in.
pub const E401: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 401,
};

/// More than one connection drives the same destination bit.
pub const E402: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 402,
};

/// An input pin required by a gate's kind has no driving connection.
pub const E403: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 403,
};

/// An input port is never read anywhere in the netlist.
pub const W200: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 200,
};

/// A `VCC`/`GND` gate (whether from a literal instance or a materialized
/// constant bit) never drives anything.
pub const W201: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 201,
};

/// An output port is never driven by any connection.
pub const W202: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 202,
};

/// The optional acyclicity pass found a combinational cycle.
pub const W203: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 203,
};

/// Creates a diagnostic for a duplicated gate or port name.
pub fn error_duplicate_name(name: &str, span: Span, prev_span: Span) -> Diagnostic {
    Diagnostic::error(E400, format!("duplicate name `{name}`"), span)
        .with_label(Label::secondary(prev_span, "previously declared here"))
}

/// Creates a diagnostic for a connection endpoint that references an
/// unknown port, an out-of-range bit, or a pin that does not exist (or
/// does not carry the required role) on a gate's kind.
pub fn error_invalid_endpoint(message: impl Into<String>, span: Span) -> Diagnostic {
    Diagnostic::error(E401, message, span)
}

/// Creates a diagnostic for a destination bit driven by more than one
/// connection.
pub fn error_multi_driver(destination: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E402, format!("`{destination}` is driven by more than one connection"), span)
        .with_help("remove or re-route one of the conflicting connections")
}

/// Creates a diagnostic for a gate input pin with no driver.
pub fn error_missing_driver(gate_name: &str, pin: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E403, format!("`{gate_name}.{pin}` has no driver"), span)
}

/// Creates a warning for an input port that is never read.
pub fn warn_unused_port(name: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(W200, format!("input port `{name}` is never read"), span)
}

/// Creates a warning for an unreferenced constant source (a `VCC`/`GND`
/// gate whose output drives nothing).
pub fn warn_unused_constant(name: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(W201, format!("`{name}` is never referenced"), span)
}

/// Creates a warning for an output port that is never driven.
pub fn warn_unconnected_output(name: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(W202, format!("output port `{name}` is never driven"), span)
}

/// Creates a warning for a detected combinational cycle.
pub fn warn_combinational_cycle(span: Span) -> Diagnostic {
    Diagnostic::warning(W203, "combinational cycle detected among gates", span)
        .with_note("cycles settle but never latch; this is legal, not a wiring mistake")
}
