//! The debug-info sidecar: an optional, purely informational JSON document
//! mapping a compiled component's ports and packed gates back to source
//! locations.
//!
//! The simulator never reads this crate's output; it exists for tooling
//! built on top of `shdl_sim` (a waveform viewer, an IDE integration) that
//! wants to turn a packed lane number or a signal name back into source
//! text. See [`DebugInfo`].

#![warn(missing_docs)]

pub mod error;
pub mod sidecar;

pub use error::DebugInfoError;
pub use sidecar::{ComponentDebugInfo, DebugInfo, GateInfo, PortInfo, SourceLocation};
