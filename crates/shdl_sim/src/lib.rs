//! The Simulator: turns an analyzed netlist into a packed bit-parallel
//! runtime exposing `reset`/`poke`/`peek`/`step`.
//!
//! [`program::PackedProgram`] is the "code generation" stage — it derives
//! the gather/extract tables a native backend would emit from machine
//! code, but this crate interprets them directly rather than compiling
//! anything. [`simulator::Simulator`] is the runtime that walks them one
//! cycle at a time.

#![warn(missing_docs)]

pub mod config;
pub mod program;
pub mod simulator;

pub use config::SimConfig;
pub use program::{OutputDriver, PackedProgram, PinGathers, Source};
pub use simulator::Simulator;
