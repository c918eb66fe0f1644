//! Tseitin CNF conversion over the AIG, with a persistent variable cache
//! (spec.md §4.1, §9 "CNF variable numbering stability").
//!
//! Two properties matter for a bounded model checker that calls `to_cnf`
//! thousands of times over a growing unrolled formula:
//!
//! - **Stability**: the same AIG node always gets the same CNF variable
//!   number, across calls, for the lifetime of the `BeManager`. Physical
//!   BE variables map to CNF variables as `phys + 1`; AND-gates get a
//!   fresh auxiliary variable the first time they're visited. This is why
//!   `cnf_cache`/`next_cnf_var` live on `BeManager` rather than being
//!   reconstructed per call — an incremental SAT solver's clause database
//!   only makes sense if variable identity persists across `to_cnf` calls.
//! - **Incrementality**: once a node's defining clauses have been handed to
//!   a solver, re-emitting them is wasted work — *unless* the caller is
//!   about to talk to a *different* solver group that has never seen them.
//!   [`BeManager::apply_inlining`] exists for that case: `force = true`
//!   re-emits every defining clause reachable from `e`, even for nodes
//!   already in the cache.

use crate::node::{BeId, BeManager, Node};

/// A DIMACS-style literal: a positive or negative CNF variable number.
/// Variable `0` never occurs; a literal's absolute value is the variable.
pub type Lit = i64;

/// A CNF formula as a flat list of clauses, each a disjunction of
/// literals, plus the highest variable number used so far.
#[derive(Debug, Clone, Default)]
pub struct CnfFormula {
    pub clauses: Vec<Vec<Lit>>,
    pub num_vars: i64,
}

impl CnfFormula {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl BeManager {
    /// Converts `e` to CNF, returning the literal that is true iff `e` is
    /// true, together with the (incrementally-new) defining clauses.
    ///
    /// Nodes already converted on a previous call contribute no clauses
    /// here — use [`BeManager::apply_inlining`] with `force = true` when a
    /// fresh solver group needs the full clause set resent.
    pub fn to_cnf(&mut self, e: BeId) -> (Lit, CnfFormula) {
        self.convert(e, false)
    }

    /// Eagerly warms the CNF cache for every node reachable from `e` and
    /// returns its defining clauses. With `force = true`, clauses are
    /// re-emitted even for nodes already in the cache — needed when
    /// handing a formula to a solver group that has not seen them yet,
    /// since variable numbers (and hence node identity) are reused but the
    /// group's clause database starts empty.
    pub fn apply_inlining(&mut self, e: BeId, force: bool) -> CnfFormula {
        let (_, cnf) = self.convert(e, force);
        cnf
    }

    fn convert(&mut self, e: BeId, force: bool) -> (Lit, CnfFormula) {
        if self.next_cnf_var <= self.reserved() as i64 {
            self.next_cnf_var = self.reserved() as i64 + 1;
        }
        let mut clauses = Vec::new();
        let var = self.cnf_visit(e.idx(), force, &mut clauses);
        let top = if e.neg() { -var } else { var };
        let cnf = CnfFormula {
            clauses,
            num_vars: self.next_cnf_var - 1,
        };
        (top, cnf)
    }

    fn cnf_visit(&mut self, idx: u32, force: bool, clauses: &mut Vec<Vec<Lit>>) -> Lit {
        if let Node::Var(phys) = *self.node_at(idx) {
            let var = phys as i64 + 1;
            self.cnf_cache.entry(idx).or_insert(var);
            return var;
        }

        let cached = self.cnf_cache.get(&idx).copied();
        if let Some(var) = cached {
            if !force {
                return var;
            }
        }
        let var = cached.unwrap_or_else(|| {
            let v = self.next_cnf_var;
            self.next_cnf_var += 1;
            v
        });
        if cached.is_none() {
            self.cnf_cache.insert(idx, var);
        }

        match *self.node_at(idx) {
            Node::Const => {
                clauses.push(vec![var]);
            }
            Node::Var(_) => unreachable!("handled above"),
            Node::And(l, r) => {
                let lv = self.cnf_visit(l.idx(), force, clauses);
                let ll = if l.neg() { -lv } else { lv };
                let rv = self.cnf_visit(r.idx(), force, clauses);
                let rl = if r.neg() { -rv } else { rv };
                // Tseitin definition: var <-> (ll ∧ rl)
                clauses.push(vec![-var, ll]);
                clauses.push(vec![-var, rl]);
                clauses.push(vec![var, -ll, -rl]);
            }
        }
        var
    }
}
