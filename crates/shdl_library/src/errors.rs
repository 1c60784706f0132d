//! Diagnostic codes and helper constructors for library-resolution errors.
//!
//! Codes `E100`-`E103` cover the errors this crate alone is responsible for:
//! referencing a module or component that cannot be found, and import
//! cycles between modules. `E104` (duplicate component name) is raised here
//! too since a module merging two same-named components is a library-level
//! concern, not a flattener one.

use shdl_diagnostics::{Category, Diagnostic, DiagnosticCode, Label};
use shdl_source::Span;

/// A component name was referenced that names neither a primitive nor any
/// component visible from the current module.
pub const E100: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 100,
};

/// A component name was imported from a specific module, but that module
/// does not define a component by that name.
pub const E101: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 101,
};

/// An `use module_name :: { ... }` import named a module the configured
/// [`ModuleSource`](crate::ModuleSource) could not locate.
pub const E102: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 102,
};

/// Resolving a chain of imports returned to a module already on the
/// resolution stack.
pub const E103: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 103,
};

/// Two components with the same name exist in the same module, or a
/// module-local import shadows an already-merged component name.
pub const E104: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 104,
};

/// Creates a diagnostic for an unresolvable component reference.
pub fn error_unknown_component(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E100, format!("unknown component `{name}`"), span)
        .with_help("check the spelling, or that the defining module is imported")
}

/// Creates a diagnostic for a component missing from an explicitly
/// imported module.
pub fn error_component_not_in_module(component: &str, module: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E101,
        format!("module `{module}` has no component named `{component}`"),
        span,
    )
}

/// Creates a diagnostic for an import naming an unknown module.
pub fn error_module_not_found(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E102, format!("module `{name}` not found"), span)
}

/// Creates a diagnostic for an import cycle, naming the module that closed
/// the loop.
pub fn error_import_cycle(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E103, format!("import cycle detected at module `{name}`"), span)
        .with_note("modules may not import one another in a cycle, directly or indirectly")
}

/// Creates a diagnostic for a duplicate component name, pointing back at
/// the first declaration.
pub fn error_duplicate_component(name: &str, span: Span, prev_span: Span) -> Diagnostic {
    Diagnostic::error(E104, format!("duplicate component `{name}`"), span)
        .with_label(Label::secondary(prev_span, "previously defined here"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_formats() {
        assert_eq!(format!("{E100}"), "E100");
        assert_eq!(format!("{E103}"), "E103");
    }

    #[test]
    fn unknown_component_diagnostic() {
        let d = error_unknown_component("HalfAdder", Span::DUMMY);
        assert_eq!(d.code, E100);
        assert!(d.message.contains("HalfAdder"));
    }

    #[test]
    fn component_not_in_module_diagnostic() {
        let d = error_component_not_in_module("FullAdder", "adders", Span::DUMMY);
        assert_eq!(d.code, E101);
        assert!(d.message.contains("adders"));
    }

    #[test]
    fn module_not_found_diagnostic() {
        let d = error_module_not_found("missing", Span::DUMMY);
        assert_eq!(d.code, E102);
    }

    #[test]
    fn import_cycle_diagnostic() {
        let d = error_import_cycle("a", Span::DUMMY);
        assert_eq!(d.code, E103);
        assert!(!d.notes.is_empty());
    }

    #[test]
    fn duplicate_component_diagnostic() {
        let d = error_duplicate_component("HalfAdder", Span::DUMMY, Span::DUMMY);
        assert_eq!(d.code, E104);
        assert_eq!(d.labels.len(), 1);
    }
}
