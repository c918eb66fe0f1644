//! The BE (Boolean Expression) layer: a hash-consed and-inverter-graph
//! manager over physical variable indices, with support for time-shifting
//! (`bmc-encoder` sits on top and owns the logical index space) and Tseitin
//! CNF conversion (spec.md §4.1).

mod cnf;
mod node;
mod shift;

pub use cnf::{CnfFormula, Lit};
pub use node::{BeId, BeManager, PhysIdx};
pub use shift::LogIdx;
