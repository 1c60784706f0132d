//! Import resolution and the merged, flat component namespace.

use std::collections::HashMap;

use shdl_ast::{Component, PrimitiveKind};
use shdl_common::{Ident, Interner};
use shdl_diagnostics::DiagnosticSink;
use shdl_source::Span;

use crate::errors;
use crate::source::ModuleSource;

/// The merged component namespace produced by resolving a root module and
/// everything it transitively imports.
///
/// Primitive kinds (`AND`, `OR`, ...) are never stored here: they are
/// recognized directly by [`ResolvedLibrary::lookup`] via
/// [`PrimitiveKind::from_name`], since they exist independent of any
/// module.
pub struct ResolvedLibrary {
    components: HashMap<Ident, Component>,
}

/// What a name in an instance's `kind` position refers to.
pub enum Resolution<'a> {
    /// One of the six built-in primitives.
    Primitive(PrimitiveKind),
    /// A user-defined component.
    Component(&'a Component),
}

impl ResolvedLibrary {
    /// Looks up a component or primitive by interned name as it would
    /// appear in an instance's `kind` field.
    ///
    /// `interner` is needed because primitive names are matched against
    /// their string spelling, not their `Ident` value (primitives have no
    /// `Ident` of their own until interned by whoever wrote the source).
    pub fn lookup<'a>(&'a self, name: Ident, interner: &Interner) -> Option<Resolution<'a>> {
        if let Some(prim) = PrimitiveKind::from_name(interner.resolve(name)) {
            return Some(Resolution::Primitive(prim));
        }
        self.components.get(&name).map(Resolution::Component)
    }

    /// Looks up a user-defined component directly, without considering
    /// primitives.
    pub fn component(&self, name: Ident) -> Option<&Component> {
        self.components.get(&name)
    }

    /// The number of user-defined components in the merged namespace.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Iterates over every user-defined component's name.
    pub fn component_names(&self) -> impl Iterator<Item = Ident> + '_ {
        self.components.keys().copied()
    }

    /// `true` if no user-defined components were merged.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Resolves `root_module` and its transitive imports against `source` into
/// a single flat [`ResolvedLibrary`].
///
/// Diagnostics for unknown modules, import cycles, duplicate component
/// names, and components missing from an explicitly imported module are
/// emitted to `sink`; resolution continues past each recoverable error so
/// that a single compile attempt can report more than one problem.
pub fn resolve(
    source: &dyn ModuleSource,
    interner: &Interner,
    sink: &DiagnosticSink,
    root_module: Ident,
    root_span: Span,
) -> ResolvedLibrary {
    let mut components = HashMap::new();
    let mut first_span = HashMap::new();
    let mut stack = Vec::new();
    resolve_module(
        source,
        interner,
        sink,
        root_module,
        root_span,
        &mut components,
        &mut first_span,
        &mut stack,
    );
    ResolvedLibrary { components }
}

fn resolve_module(
    source: &dyn ModuleSource,
    interner: &Interner,
    sink: &DiagnosticSink,
    module_name: Ident,
    span: Span,
    components: &mut HashMap<Ident, Component>,
    first_span: &mut HashMap<Ident, Span>,
    stack: &mut Vec<Ident>,
) {
    if stack.contains(&module_name) {
        sink.emit(errors::error_import_cycle(interner.resolve(module_name), span));
        return;
    }

    let module = match source.load(module_name) {
        Ok(module) => module,
        Err(_) => {
            sink.emit(errors::error_module_not_found(interner.resolve(module_name), span));
            return;
        }
    };

    stack.push(module_name);

    for component in &module.components {
        insert_component(component.clone(), components, first_span, sink, interner);
    }

    for import in &module.imports {
        resolve_module(
            source,
            interner,
            sink,
            import.module_name,
            import.span,
            components,
            first_span,
            stack,
        );
        check_import_names(source, interner, sink, import);
    }

    stack.pop();
}

fn insert_component(
    component: Component,
    components: &mut HashMap<Ident, Component>,
    first_span: &mut HashMap<Ident, Span>,
    sink: &DiagnosticSink,
    interner: &Interner,
) {
    if let Some(&prev_span) = first_span.get(&component.name) {
        sink.emit(errors::error_duplicate_component(
            interner.resolve(component.name),
            component.span,
            prev_span,
        ));
        return;
    }
    first_span.insert(component.name, component.span);
    components.insert(component.name, component);
}

fn check_import_names(
    source: &dyn ModuleSource,
    interner: &Interner,
    sink: &DiagnosticSink,
    import: &shdl_ast::Import,
) {
    let Ok(module) = source.load(import.module_name) else {
        // Already reported as ModuleNotFound by the recursive resolve above.
        return;
    };
    for &name in &import.names {
        if module.component(name).is_none() {
            sink.emit(errors::error_component_not_in_module(
                interner.resolve(name),
                interner.resolve(import.module_name),
                import.span,
            ));
        }
    }
}
