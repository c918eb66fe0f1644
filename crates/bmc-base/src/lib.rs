//! Shared primitives for the bmc-core crates: symbol interning and the core
//! error taxonomy.
//!
//! # Milner Invariant
//!
//! This crate has no dependency on any other `bmc-*` crate and never will —
//! it sits at the bottom of the dependency graph (spec.md §2: "leaves
//! first").

mod error;
mod intern;
mod loop_sel;

pub use error::{CoreError, CoreResult, SatFailure};
pub use intern::{Interner, Symbol};
pub use loop_sel::LoopSelector;
