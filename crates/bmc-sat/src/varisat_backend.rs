//! A production-grade back-end wrapping the `varisat` CDCL solver,
//! mirroring the optional `z3` dependency pattern the teacher's
//! verification crate uses (present only behind a feature flag so the
//! core crates stay dependency-light by default).
//!
//! `varisat` has no native notion of clause groups, so groups are
//! emulated with the standard activation-literal technique: a group's
//! clauses are each widened with `¬activation_lit`, and a `solve_*` call
//! assumes `activation_lit` for every group that should participate.
//! Destroying a group just means it is never assumed again — its
//! widened clauses remain in the solver but are permanently disabled.

use std::collections::HashMap;

use bmc_base::{CoreError, SatFailure};
use varisat::{CnfFormula as VarisatCnf, ExtendFormula, Lit as VarisatLit, Solver};

use crate::traits::{GroupId, IncrementalSatSolver, Lit, SatSolver, SolveResult};

const PERMANENT: GroupId = 0;

pub struct VarisatSolver {
    solver: Solver<'static>,
    activation: HashMap<GroupId, VarisatLit>,
    next_group: GroupId,
    next_activation_var: i32,
    max_problem_var: i32,
}

impl VarisatSolver {
    pub fn new() -> Self {
        VarisatSolver {
            solver: Solver::new(),
            activation: HashMap::new(),
            next_group: PERMANENT + 1,
            next_activation_var: -1,
            max_problem_var: 0,
        }
    }

    fn to_varisat_lit(lit: Lit) -> VarisatLit {
        let var = (lit.unsigned_abs() - 1) as usize;
        VarisatLit::from_index(var, lit > 0)
    }

    fn fresh_activation_lit(&mut self) -> VarisatLit {
        // Activation variables are numbered downward from -1 so they
        // never collide with problem variables (numbered upward from 1
        // by `to_varisat_lit`, mirroring `bmc-be`'s CNF var numbering).
        let idx = self.next_activation_var;
        self.next_activation_var -= 1;
        VarisatLit::from_dimacs(idx)
    }

    fn add_clause_to(&mut self, group: GroupId, clause: &[Lit]) {
        for &l in clause {
            self.max_problem_var = self.max_problem_var.max(l.unsigned_abs() as i32);
        }
        let mut widened: Vec<VarisatLit> = clause.iter().map(|&l| Self::to_varisat_lit(l)).collect();
        if group != PERMANENT {
            let act = *self
                .activation
                .get(&group)
                .expect("contract violation: add_to_group on an unknown group");
            widened.push(!act);
        }
        let mut formula = VarisatCnf::new();
        formula.add_clause(&widened);
        self.solver.add_formula(&formula);
    }

    fn run(&mut self, assumptions: &[VarisatLit]) -> Result<SolveResult, SatFailure> {
        self.solver.assume(assumptions);
        match self.solver.solve() {
            Ok(true) => {
                let model = self
                    .solver
                    .model()
                    .expect("contract violation: SAT result with no model");
                let mut assignment = vec![false; self.max_problem_var as usize];
                for lit in model {
                    let idx = lit.index();
                    if idx < assignment.len() {
                        assignment[idx] = lit.is_positive();
                    }
                }
                Ok(SolveResult::Sat(assignment))
            }
            Ok(false) => Ok(SolveResult::Unsat),
            Err(_) => Err(SatFailure::InternalError),
        }
    }

    fn live_assumptions(&self, excluded: &[GroupId]) -> Vec<VarisatLit> {
        self.activation
            .iter()
            .filter(|(g, _)| !excluded.contains(g))
            .map(|(_, lit)| *lit)
            .collect()
    }
}

impl Default for VarisatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SatSolver for VarisatSolver {
    fn add_clause(&mut self, clause: &[Lit]) {
        self.add_clause_to(PERMANENT, clause);
    }

    fn solve(&mut self) -> bmc_base::CoreResult<SolveResult> {
        self.run(&self.live_assumptions(&[])).map_err(CoreError::SatBackend)
    }
}

impl IncrementalSatSolver for VarisatSolver {
    fn permanent_group(&self) -> GroupId {
        PERMANENT
    }

    fn create_group(&mut self) -> GroupId {
        let id = self.next_group;
        self.next_group += 1;
        let act = self.fresh_activation_lit();
        self.activation.insert(id, act);
        id
    }

    fn destroy_group(&mut self, group: GroupId) {
        assert!(
            group != PERMANENT,
            "contract violation: cannot destroy the permanent group"
        );
        self.activation
            .remove(&group)
            .expect("contract violation: destroy_group on an unknown group");
    }

    fn add_to_group(&mut self, group: GroupId, clause: &[Lit]) {
        self.add_clause_to(group, clause);
    }

    fn solve_all_groups(&mut self) -> bmc_base::CoreResult<SolveResult> {
        let assumptions = self.live_assumptions(&[]);
        self.run(&assumptions).map_err(CoreError::SatBackend)
    }

    fn solve_without_groups(&mut self, excluded: &[GroupId]) -> bmc_base::CoreResult<SolveResult> {
        let assumptions = self.live_assumptions(excluded);
        self.run(&assumptions).map_err(CoreError::SatBackend)
    }

    fn set_polarity(&mut self, lit: Lit, value: bool) {
        let vlit = Self::to_varisat_lit(lit.abs());
        self.solver.set_polarity(vlit.var(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_clauses_are_satisfied_directly() {
        let mut s = VarisatSolver::new();
        s.add_clause(&[1]);
        s.add_clause(&[-2]);
        match s.solve().unwrap() {
            SolveResult::Sat(model) => {
                assert!(model[0]);
                assert!(!model[1]);
            }
            SolveResult::Unsat => panic!("expected SAT"),
        }
    }

    #[test]
    fn contradiction_is_unsat() {
        let mut s = VarisatSolver::new();
        s.add_clause(&[1]);
        s.add_clause(&[-1]);
        assert_eq!(s.solve().unwrap(), SolveResult::Unsat);
    }

    #[test]
    fn destroyed_group_clauses_stop_constraining_the_search() {
        let mut s = VarisatSolver::new();
        s.add_clause(&[1]);
        let g = s.create_group();
        s.add_to_group(g, &[-1]);
        assert_eq!(s.solve_all_groups().unwrap(), SolveResult::Unsat);
        s.destroy_group(g);
        match s.solve_all_groups().unwrap() {
            SolveResult::Sat(model) => assert!(model[0]),
            SolveResult::Unsat => panic!("expected SAT after destroying the conflicting group"),
        }
    }

    #[test]
    fn solve_without_groups_excludes_named_group_for_one_call() {
        let mut s = VarisatSolver::new();
        s.add_clause(&[1]);
        let g = s.create_group();
        s.add_to_group(g, &[-1]);
        assert_eq!(s.solve_without_groups(&[g]).unwrap(), SolveResult::Sat(vec![true]));
        assert_eq!(s.solve_all_groups().unwrap(), SolveResult::Unsat);
    }
}
