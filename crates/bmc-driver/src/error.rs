//! Driver-level errors: wraps [`bmc_base::CoreError`] and adds the
//! user-input error classes that only make sense once a concrete
//! algorithm is chosen (spec.md §7).

use std::fmt;

use bmc_base::CoreError;

/// Errors a driver-level call can report. Never a contract violation —
/// those remain `panic!`/`debug_assert!` sites in the crates underneath,
/// per spec.md §7's taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// Propagated from a lower layer (bad loop string, SAT back-end
    /// failure, already-checked property, ...).
    Core(CoreError),
    /// Dual/backward was invoked on a system with input variables
    /// (spec.md §4.7.2: backward closure requires none). The caller
    /// should fall back to Dual/forward or Falsification.
    BackwardWithInputs,
    /// An algorithm declined to run for a reason not covered by the
    /// other variants (e.g. Een–Sørensson's `K_max` exhausted with
    /// neither direction conclusive).
    AlgorithmDeclined(String),
}

impl From<CoreError> for DriverError {
    fn from(e: CoreError) -> Self {
        DriverError::Core(e)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Core(e) => write!(f, "{}", e),
            DriverError::BackwardWithInputs => {
                write!(f, "Dual/backward requires a system with no input variables")
            }
            DriverError::AlgorithmDeclined(msg) => write!(f, "algorithm declined: {}", msg),
        }
    }
}

impl std::error::Error for DriverError {}

pub type DriverResult<T> = std::result::Result<T, DriverError>;
