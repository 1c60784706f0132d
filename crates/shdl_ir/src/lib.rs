//! Base-form IR: the flat, single-level netlist produced by flattening.
//!
//! Where `shdl_ast` represents the hierarchical, parametric Expanded form a
//! parser builds, this crate represents what the flattener produces from
//! it: a design with no subcomponents, no generators, no slices and no
//! named constants left, only primitive gate instances and single-bit
//! connections between them. This is also the analyzer's input and the
//! simulator's ultimate source of truth.

#![warn(missing_docs)]

pub mod arena;
pub mod endpoint;
pub mod gate;
pub mod ids;
pub mod netlist;

pub use arena::{Arena, ArenaId};
pub use endpoint::{Connection, Endpoint, Pin};
pub use gate::Gate;
pub use ids::GateId;
pub use netlist::{Design, Netlist};
