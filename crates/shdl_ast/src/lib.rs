//! Expanded-form AST types for SHDL.
//!
//! This crate represents the output of the (external) textual parser: a
//! hierarchical, parametric tree of components, subcomponent instances,
//! named constants, generator loops, and connections with slice/index
//! expressions. Nothing in this crate reads source text — these types are
//! the product a parser must build, not the parser itself.

#![warn(missing_docs)]

pub mod component;
pub mod expr;
pub mod primitive;

pub use component::{
    BodyItem, Component, Connection, Constant, Generator, Import, Instance, Module, Port,
    SignalRef,
};
pub use expr::{ArithExpr, BinaryOp, IndexSpec, NameSegment, RangeSpec, TemplatedName};
pub use primitive::PrimitiveKind;
