//! The host-supplied module-location trait.
//!
//! This crate never reads a filesystem, a package registry, or any other
//! storage medium itself — and it never tokenizes or parses text. A host
//! (a CLI, a build-system plugin, a test harness) supplies a
//! [`ModuleSource`] that already knows how to turn a module name into a
//! parsed [`Module`](shdl_ast::Module); this crate only does caching,
//! cycle detection, and namespace merging on top of it.

use shdl_ast::Module;
use shdl_common::Ident;

/// The reason a [`ModuleSource`] failed to produce a module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleSourceError {
    /// No module by this name is known to the host.
    NotFound,
}

/// Locates and supplies the parsed contents of a named module.
///
/// Implementations typically wrap a textual parser plus whatever
/// module-to-file resolution convention the host uses (a search path, a
/// package manifest, single-file bundling, ...). None of that is this
/// crate's concern; it only needs the resulting [`Module`] value.
pub trait ModuleSource {
    /// Returns the parsed module named `module_name`, or an error if no
    /// such module is known.
    fn load(&self, module_name: Ident) -> Result<Module, ModuleSourceError>;
}

/// An in-memory [`ModuleSource`] backed by a name-to-module map.
///
/// Useful for tests and for hosts that have already parsed an entire
/// design up front (e.g. a single-file bundle) rather than resolving
/// modules lazily.
#[derive(Default)]
pub struct MapModuleSource {
    modules: std::collections::HashMap<Ident, Module>,
}

impl MapModuleSource {
    /// Creates an empty module source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parsed module under the given name, replacing any
    /// previous entry.
    pub fn insert(&mut self, name: Ident, module: Module) {
        self.modules.insert(name, module);
    }
}

impl ModuleSource for MapModuleSource {
    fn load(&self, module_name: Ident) -> Result<Module, ModuleSourceError> {
        self.modules
            .get(&module_name)
            .cloned()
            .ok_or(ModuleSourceError::NotFound)
    }
}
