//! Diagnostic codes and helper constructors for flattening errors.
//!
//! `E300`-`E305` cover the errors unique to this crate's four phases
//! (generator expansion, slice expansion, constant materialization,
//! hierarchy inlining); `MultiDriver`/`MissingDriver` belong to
//! `shdl_analyze` instead, since they require the fully-resolved
//! connection graph that only exists once flattening is done.

use shdl_diagnostics::{Category, Diagnostic, DiagnosticCode};
use shdl_source::Span;

/// A generator's range evaluated to an empty (or reversed) interval.
pub const E300: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 300,
};

/// A generator re-declared a variable already bound by an enclosing generator.
pub const E301: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 301,
};

/// Generator substitution produced two instances with the same name.
pub const E302: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 302,
};

/// A slice index fell outside `1..=width` of the referenced port or pin.
pub const E303: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 303,
};

/// The two sides of a connection had different bit widths.
pub const E304: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 304,
};

/// A component, directly or indirectly, instantiates itself.
pub const E305: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 305,
};

/// Division by zero inside a generator's `{expr}` template.
pub const E306: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 306,
};

/// Creates a diagnostic for an empty or reversed generator range.
pub fn error_empty_generator_range(span: Span) -> Diagnostic {
    Diagnostic::error(E300, "generator range is empty", span)
        .with_help("generator ranges expand in ascending order; check the bounds")
}

/// Creates a diagnostic for a generator variable shadowing an enclosing one.
pub fn error_shadowing_generator(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E301,
        format!("generator variable `{name}` shadows an enclosing generator"),
        span,
    )
}

/// Creates a diagnostic for two instances ending up with the same name
/// after generator substitution.
pub fn error_duplicate_instance(name: &str, span: Span, prev_span: Span) -> Diagnostic {
    Diagnostic::error(E302, format!("duplicate instance `{name}`"), span).with_label(
        shdl_diagnostics::Label::secondary(prev_span, "previously declared here"),
    )
}

/// Creates a diagnostic for a slice index out of the referenced width.
pub fn error_slice_out_of_range(name: &str, index: i64, width: u32, span: Span) -> Diagnostic {
    Diagnostic::error(
        E303,
        format!("index {index} out of range for `{name}` (width {width})"),
        span,
    )
}

/// Creates a diagnostic for a width mismatch between the two sides of a connection.
pub fn error_width_mismatch(source_width: u32, dest_width: u32, span: Span) -> Diagnostic {
    Diagnostic::error(
        E304,
        format!("width mismatch: source is {source_width} bit(s), destination is {dest_width} bit(s)"),
        span,
    )
}

/// Creates a diagnostic for a recursive (directly or indirectly
/// self-instantiating) component.
pub fn error_recursive_component(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E305, format!("component `{name}` instantiates itself"), span)
        .with_note("component instantiation must form a DAG")
}

/// Creates a diagnostic for division by zero in a generator expression.
pub fn error_division_by_zero(span: Span) -> Diagnostic {
    Diagnostic::error(E306, "division by zero in generator expression", span)
}
