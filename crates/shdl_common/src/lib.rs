//! Shared foundational types used across the SHDL toolchain.
//!
//! This crate provides core types including interned identifiers, content
//! hashing, and common result types. It deliberately does not provide
//! multi-valued logic types: every signal in this toolchain is a plain bit,
//! so a 4-state `Logic`/`LogicVec` pair (useful for tri-state HDLs) is not
//! part of this crate.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use result::{InternalError, ShdlResult};
