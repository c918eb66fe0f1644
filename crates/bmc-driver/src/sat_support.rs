//! Bridges `bmc-be`'s CNF conversion to the `bmc-sat` trait objects.
//!
//! Tseitin defining clauses are facts about shared subformulas and never
//! need to be retracted, so they always go to the permanent group;
//! only the unit clause asserting (or denying) the top-level literal is
//! placed in a caller-chosen group. This lets an incremental algorithm
//! destroy a temporary assumption without destroying the structural
//! clauses other groups still depend on.

use bmc_be::BeId;
use bmc_be::BeManager;
use bmc_sat::{GroupId, IncrementalSatSolver, SatSolver};

/// Asserts `e` (non-incremental): pushes its Tseitin clauses and a unit
/// clause forcing it true.
pub fn assert_true(be: &mut BeManager, sat: &mut dyn SatSolver, e: BeId) {
    let (lit, cnf) = be.to_cnf(e);
    for clause in cnf.clauses {
        sat.add_clause(&clause);
    }
    sat.add_clause(&[lit]);
}

/// Asserts `e` with the given polarity into a specific group
/// (incremental): Tseitin clauses go to the permanent group, the unit
/// clause goes to `group`.
pub fn assert_in_group(be: &mut BeManager, sat: &mut dyn IncrementalSatSolver, group: GroupId, e: BeId, polarity: bool) {
    let (lit, cnf) = be.to_cnf(e);
    let perm = sat.permanent_group();
    for clause in cnf.clauses {
        sat.add_to_group(perm, &clause);
    }
    let signed = if polarity { lit } else { -lit };
    sat.add_to_group(group, &[signed]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmc_sat::{DpllSolver, SolveResult};

    #[test]
    fn assert_true_forces_satisfiability_of_the_literal() {
        let mut be = BeManager::new();
        be.reserve(1);
        let v = be.mk_var(0);
        let mut sat = DpllSolver::new();
        assert_true(&mut be, &mut sat, v);
        match sat.solve().unwrap() {
            SolveResult::Sat(model) => assert!(model[0]),
            SolveResult::Unsat => panic!("expected SAT"),
        }
    }

    #[test]
    fn assert_in_group_with_false_polarity_is_unsat_alongside_a_true_assertion() {
        let mut be = BeManager::new();
        be.reserve(1);
        let v = be.mk_var(0);
        let mut sat = DpllSolver::new();
        assert_true(&mut be, &mut sat, v);
        let g = sat.create_group();
        assert_in_group(&mut be, &mut sat, g, v, false);
        assert_eq!(sat.solve_all_groups().unwrap(), SolveResult::Unsat);
        sat.destroy_group(g);
        assert!(matches!(sat.solve_all_groups().unwrap(), SolveResult::Sat(_)));
    }
}
