//! Core error type shared by every layer of the bounded model checker.
//!
//! Per spec.md §7, the core distinguishes three error classes:
//!
//! - **Contract violations** are bugs in the caller (out-of-range index,
//!   class mismatch, double registration). These are *not* represented
//!   here — they are `panic!`/`debug_assert!` sites in the crate that
//!   detects them, since recovering from them would paper over a broken
//!   invariant.
//! - **SAT back-end failures** (`InternalError`, `Timeout`, `Memout`) are
//!   fatal to the current algorithm run but not to the process; they are
//!   represented as [`CoreError::SatBackend`].
//! - **User-input errors** (bad loop string, property already checked,
//!   backward-Dual with inputs, a rewrite that fails) are represented as
//!   the other [`CoreError`] variants and are meant to be handled by the
//!   caller (the driver reports a warning and moves on, per spec.md §7).

use std::fmt;

/// Errors that can cross a crate boundary in the core.
///
/// Each downstream crate (`bmc-encoder`, `bmc-tableau`, `bmc-driver`, ...)
/// defines its own error enum and converts into/from `CoreError` with
/// `From`, the same layering `logicaffeine-kernel`'s `InterfaceError` uses
/// over `KernelError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A user-supplied loop descriptor could not be parsed (spec.md §6.1:
    /// anything other than `"X"`, `"*"`, or an integer).
    InvalidLoopString(String),

    /// A loop value is out of range for the given bound `k` (e.g. a
    /// single-loop `l >= k`, spec.md §8 boundary behaviors).
    LoopOutOfRange { l: i64, k: usize },

    /// The requested property index does not exist.
    PropertyIndexOutOfRange(usize),

    /// The property has already been checked and has a non-`Unknown`
    /// status; re-checking it is a no-op warning, not a crash.
    PropertyAlreadyChecked,

    /// A rewrite of a non-propositional invariant into boolean form failed.
    /// The temporary symbol layer introduced for the rewrite must be
    /// removed by the caller on this error.
    RewriteFailed(String),

    /// The SAT back-end reported a failure that the algorithm cannot
    /// recover from (spec.md §6.3 / §7).
    SatBackend(SatFailure),
}

/// The three failure modes a SAT back-end call can report (spec.md §6.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatFailure {
    InternalError,
    Timeout,
    Memout,
}

impl fmt::Display for SatFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SatFailure::InternalError => write!(f, "internal error in SAT back-end"),
            SatFailure::Timeout => write!(f, "SAT back-end timed out"),
            SatFailure::Memout => write!(f, "SAT back-end ran out of memory"),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidLoopString(s) => {
                write!(f, "invalid loop descriptor: '{}'", s)
            }
            CoreError::LoopOutOfRange { l, k } => {
                write!(f, "loop value {} is not valid for bound k={}", l, k)
            }
            CoreError::PropertyIndexOutOfRange(i) => {
                write!(f, "no property at index {}", i)
            }
            CoreError::PropertyAlreadyChecked => {
                write!(f, "property has already been checked")
            }
            CoreError::RewriteFailed(msg) => {
                write!(f, "could not rewrite invariant to propositional form: {}", msg)
            }
            CoreError::SatBackend(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CoreError {}

/// Alias for `std::result::Result<T, CoreError>`.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
