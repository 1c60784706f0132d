//! Component library resolution: turning a root module name plus its
//! transitive imports into one flat, name-resolved component namespace.
//!
//! This crate owns no notion of "file" or "parser": it only knows how to
//! walk imports through a host-supplied [`ModuleSource`] and merge the
//! result, detecting the errors that can only be seen once imports are
//! followed (unknown modules, import cycles, duplicate and missing
//! component names).

#![warn(missing_docs)]

pub mod errors;
pub mod library;
pub mod source;

pub use library::{resolve, ResolvedLibrary, Resolution};
pub use source::{MapModuleSource, ModuleSource, ModuleSourceError};
