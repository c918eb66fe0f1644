//! The SAT back-end abstraction (spec.md §6.3), split into a plain
//! one-shot [`SatSolver`] and an [`IncrementalSatSolver`] that adds
//! clause groups — mirroring NuSMV's `SatSolver.h`/`SatIncSolver.h`
//! split, where only some back-ends support incremental group
//! management.
//!
//! A "group" is a named bucket of clauses that can be enabled or
//! disabled for a particular `solve` call without re-adding or
//! re-parsing them — the mechanism the five invariant-checking
//! algorithms (`bmc-driver`) use to add a new unrolling step's clauses
//! without re-sending everything already proven UNSAT.

use bmc_base::{CoreResult, SatFailure};

pub type Lit = i64;
pub type GroupId = u32;

/// The outcome of a single `solve` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Sat(Vec<bool>),
    Unsat,
}

/// A one-shot SAT solver: add clauses, solve once.
pub trait SatSolver {
    /// Adds a clause to the solver's permanent clause set.
    fn add_clause(&mut self, clause: &[Lit]);

    /// Solves the current clause set.
    ///
    /// # Errors
    ///
    /// Returns `Err` on a SAT back-end failure (spec.md §6.3/§7): never a
    /// contract violation, always a reportable-to-the-caller condition.
    fn solve(&mut self) -> CoreResult<SolveResult>;
}

/// A SAT solver that supports clause groups, so a new round of clauses
/// can be added or withdrawn from consideration without restarting the
/// whole search from scratch.
pub trait IncrementalSatSolver: SatSolver {
    /// The group that is always included in every `solve_all_groups` and
    /// `solve_without_groups` call, and can never be destroyed.
    fn permanent_group(&self) -> GroupId;

    /// Creates a new, initially-empty group and returns its id.
    fn create_group(&mut self) -> GroupId;

    /// Destroys `group`, permanently discarding its clauses.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if `group` is the permanent group or does not exist.
    fn destroy_group(&mut self, group: GroupId);

    /// Adds a clause to `group`.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if `group` does not exist.
    fn add_to_group(&mut self, group: GroupId, clause: &[Lit]);

    /// Solves with every live group's clauses included.
    fn solve_all_groups(&mut self) -> CoreResult<SolveResult>;

    /// Solves with every live group's clauses included except those in
    /// `excluded` (the permanent group is never excludable).
    fn solve_without_groups(&mut self, excluded: &[GroupId]) -> CoreResult<SolveResult>;

    /// Biases the solver's branching heuristic to try `value` for `lit`
    /// first. A hint, not a constraint.
    fn set_polarity(&mut self, lit: Lit, value: bool);
}

pub(crate) fn internal_error<T>() -> CoreResult<T> {
    Err(bmc_base::CoreError::SatBackend(SatFailure::InternalError))
}
