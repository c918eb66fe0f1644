//! The algorithmic driver (spec.md §4.7): five invariant-checking
//! algorithms plus the LTL bounded-model-checking loop (in both its
//! direct-tableau and SBMC-encoded forms), built on top of `bmc-be`'s
//! Boolean-expression manager, `bmc-encoder`'s timed variable
//! bookkeeping, `bmc-model`'s unroller, `bmc-tableau`'s formula
//! translation, and a pluggable `bmc-sat` back-end.

mod classic;
mod common;
mod config;
mod dual;
mod een_sorensson;
mod error;
mod falsification;
mod ltl_driver;
mod property;
mod sat_support;
mod sbmc_driver;
mod trace;
mod zigzag;

pub use classic::check_classic;
pub use config::{run_invariant, DriverConfig, InvariantAlgorithm};
pub use dual::{check_dual, DualDirection};
pub use een_sorensson::check_een_sorensson;
pub use error::{DriverError, DriverResult};
pub use falsification::check_falsification;
pub use ltl_driver::{check_ltl_incremental, check_ltl_non_incremental, RelativeLoop};
pub use property::{Property, PropertyKind, PropertySet, Status};
pub use sbmc_driver::{check_ltl_sbmc_incremental, check_ltl_sbmc_non_incremental};
pub use trace::{build_trace, StepKind, Trace, TraceStep};
pub use zigzag::check_zigzag;
