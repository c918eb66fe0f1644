//! The SBMC (single-pass bounded model checking) tableau: instead of the
//! direct tableau's range formulas — `AND_{i=t}^{k}`, `OR_{i=t}^{k}`, which
//! grow `Θ(k)` nodes *per call site*, for a total of `Θ(k²)` nodes across
//! an unrolling — every temporal subformula gets one auxiliary Boolean
//! variable (`el`) per `(formula, time)` pair, tied together by a single
//! defining equation per depth. That equation only ever references `t`
//! and `t ± 1` (or the loop target), so the whole tableau grows `Θ(k)`
//! (spec.md §4.6).
//!
//! `el` variables are not part of the model's state space — they exist
//! only to name a subformula's truth value at a given depth — so they are
//! allocated one at a time, lazily, via [`Encoder::alloc_aux_var`] rather
//! than through the untimed state/frozen/input registry. That registry is
//! frozen by [`Encoder::commit_layer`] before `Init`/`Trans` are built,
//! long before a property's tableau exists, so declaring `el` variables
//! through it is not an option.
//!
//! The loop position is still supplied by the caller (as in `ltl.rs`)
//! rather than encoded as extra SAT-chosen "this is the loop target"
//! variables — the latter is what lets a full SBMC implementation drop
//! the per-`(k,l)` outer loop entirely, which this simplified version
//! does not attempt (see `DESIGN.md`).

use std::collections::{HashMap, HashSet};

use bmc_be::BeId;
use bmc_encoder::Encoder;

use crate::formula::{FormulaArena, FormulaId, FormulaNode};

fn is_temporal(node: FormulaNode) -> bool {
    !matches!(
        node,
        FormulaNode::Prop(_) | FormulaNode::Not(_) | FormulaNode::And(_, _) | FormulaNode::Or(_, _)
    )
}

/// Assigns and caches the auxiliary `el` variables for every temporal
/// subformula reachable from a root formula, one per `(formula, time)`
/// pair, allocated the first time that pair is actually needed.
pub struct SbmcBuilder {
    temporal: HashSet<FormulaId>,
    temporal_nodes: Vec<FormulaId>,
    el_vars: HashMap<(FormulaId, usize), BeId>,
}

impl SbmcBuilder {
    /// Walks every subformula of `root`, recording which ones are
    /// temporal (`Prop`/`Not`/`And`/`Or` need none — they are represented
    /// directly as combinations of their children). Touches no encoder:
    /// no physical variable is allocated until
    /// [`SbmcBuilder::represent`]/[`SbmcBuilder::defining_equation`]
    /// actually needs one, so a property's builder can be constructed
    /// long after `commit_layer` without touching the untimed layout.
    pub fn new(arena: &FormulaArena, root: FormulaId) -> Self {
        let mut builder = SbmcBuilder {
            temporal: HashSet::new(),
            temporal_nodes: Vec::new(),
            el_vars: HashMap::new(),
        };
        let mut visited = HashSet::new();
        builder.collect(arena, root, &mut visited);
        builder
    }

    fn collect(&mut self, arena: &FormulaArena, f: FormulaId, visited: &mut HashSet<FormulaId>) {
        if !visited.insert(f) {
            return;
        }
        let node = arena.node(f);
        if is_temporal(node) && self.temporal.insert(f) {
            self.temporal_nodes.push(f);
        }
        match node {
            FormulaNode::Prop(_) => {}
            FormulaNode::Not(a) | FormulaNode::Next(a) | FormulaNode::Future(a) | FormulaNode::Globally(a) => {
                self.collect(arena, a, visited)
            }
            FormulaNode::Prev(a) | FormulaNode::Once(a) | FormulaNode::Historically(a) => self.collect(arena, a, visited),
            FormulaNode::And(a, b)
            | FormulaNode::Or(a, b)
            | FormulaNode::Until(a, b)
            | FormulaNode::Release(a, b)
            | FormulaNode::Since(a, b)
            | FormulaNode::Trigger(a, b) => {
                self.collect(arena, a, visited);
                self.collect(arena, b, visited);
            }
        }
    }

    /// The distinct temporal subformulas, in declaration order — the set
    /// [`SbmcBuilder::defining_equation`] must be called for, at every
    /// depth, to keep the auxiliary variables well-defined.
    pub fn temporal_nodes(&self) -> &[FormulaId] {
        &self.temporal_nodes
    }

    /// `f`'s `el` variable at time `t`, allocating it on first use.
    fn el_var(&mut self, enc: &mut Encoder, f: FormulaId, t: usize) -> BeId {
        if let Some(&v) = self.el_vars.get(&(f, t)) {
            return v;
        }
        let v = enc.alloc_aux_var();
        self.el_vars.insert((f, t), v);
        v
    }

    /// The Boolean expression standing for `f` at time `t`: its `el`
    /// variable if `f` is temporal, otherwise a direct combination of its
    /// children's representations.
    pub fn represent(&mut self, enc: &mut Encoder, arena: &FormulaArena, f: FormulaId, t: usize) -> BeId {
        if self.temporal.contains(&f) {
            return self.el_var(enc, f, t);
        }
        match arena.node(f) {
            FormulaNode::Prop(e) => enc.untimed_expr_to_timed(e, t),
            FormulaNode::Not(a) => {
                let av = self.represent(enc, arena, a, t);
                enc.be_mut().not(av)
            }
            FormulaNode::And(a, b) => {
                let av = self.represent(enc, arena, a, t);
                let bv = self.represent(enc, arena, b, t);
                enc.be_mut().and(av, bv)
            }
            FormulaNode::Or(a, b) => {
                let av = self.represent(enc, arena, a, t);
                let bv = self.represent(enc, arena, b, t);
                enc.be_mut().or(av, bv)
            }
            _ => unreachable!("temporal node without an el variable"),
        }
    }

    /// `el_f(t) ⟺ RHS(t)` for a single temporal node `f`, at a given
    /// bound `k` and loop selection. This is the one constraint that ties
    /// `el_f` at adjacent times together; conjoin it (for every temporal
    /// node) into the unrolled path formula at every depth.
    pub fn defining_equation(
        &mut self,
        enc: &mut Encoder,
        arena: &FormulaArena,
        f: FormulaId,
        t: usize,
        k: usize,
        loop_key: Option<usize>,
    ) -> BeId {
        let lhs = self.represent(enc, arena, f, t);
        let rhs = match arena.node(f) {
            FormulaNode::Next(a) => self.future_succ(enc, arena, a, t, k, loop_key, false),
            FormulaNode::Future(a) => {
                let now = self.represent(enc, arena, a, t);
                let succ = self.future_succ(enc, arena, f, t, k, loop_key, false);
                enc.be_mut().or(now, succ)
            }
            FormulaNode::Globally(a) => {
                let now = self.represent(enc, arena, a, t);
                let succ = self.future_succ(enc, arena, f, t, k, loop_key, true);
                enc.be_mut().and(now, succ)
            }
            FormulaNode::Until(a, b) => {
                let now_b = self.represent(enc, arena, b, t);
                let now_a = self.represent(enc, arena, a, t);
                let succ = self.future_succ(enc, arena, f, t, k, loop_key, false);
                let and_a_succ = enc.be_mut().and(now_a, succ);
                enc.be_mut().or(now_b, and_a_succ)
            }
            FormulaNode::Release(a, b) => {
                let now_b = self.represent(enc, arena, b, t);
                let now_a = self.represent(enc, arena, a, t);
                let succ = self.future_succ(enc, arena, f, t, k, loop_key, true);
                let or_a_succ = enc.be_mut().or(now_a, succ);
                enc.be_mut().and(now_b, or_a_succ)
            }
            FormulaNode::Prev(a) => self.past_pred(enc, arena, a, t, false),
            FormulaNode::Once(a) => {
                let now = self.represent(enc, arena, a, t);
                let pred = self.past_pred(enc, arena, f, t, false);
                enc.be_mut().or(now, pred)
            }
            FormulaNode::Historically(a) => {
                let now = self.represent(enc, arena, a, t);
                let pred = self.past_pred(enc, arena, f, t, true);
                enc.be_mut().and(now, pred)
            }
            FormulaNode::Since(a, b) => {
                let now_b = self.represent(enc, arena, b, t);
                let now_a = self.represent(enc, arena, a, t);
                let pred = self.past_pred(enc, arena, f, t, false);
                let and_a_pred = enc.be_mut().and(now_a, pred);
                enc.be_mut().or(now_b, and_a_pred)
            }
            FormulaNode::Trigger(a, b) => {
                let now_b = self.represent(enc, arena, b, t);
                let now_a = self.represent(enc, arena, a, t);
                let pred = self.past_pred(enc, arena, f, t, true);
                let or_a_pred = enc.be_mut().or(now_a, pred);
                enc.be_mut().and(now_b, or_a_pred)
            }
            FormulaNode::Prop(_) | FormulaNode::Not(_) | FormulaNode::And(_, _) | FormulaNode::Or(_, _) => {
                unreachable!("defining_equation called on a non-temporal node")
            }
        };
        enc.be_mut().iff(lhs, rhs)
    }

    /// The successor term for a future-looking fixpoint: `el_f`/`a` one
    /// step ahead if `t < k`, else the loop target's value, else the
    /// vacuous identity for the connective (`⊤` for a conjunction base
    /// case — `Globally`/`Release` — `⊥` otherwise).
    fn future_succ(
        &mut self,
        enc: &mut Encoder,
        arena: &FormulaArena,
        node: FormulaId,
        t: usize,
        k: usize,
        loop_key: Option<usize>,
        conjunctive: bool,
    ) -> BeId {
        if t < k {
            self.represent(enc, arena, node, t + 1)
        } else {
            match loop_key {
                Some(l) => self.represent(enc, arena, node, l),
                None => {
                    if conjunctive {
                        enc.be().mk_true()
                    } else {
                        enc.be().mk_false()
                    }
                }
            }
        }
    }

    /// The predecessor term for a past fixpoint: one step back if `t >
    /// 0`, else the vacuous identity (`⊤` for a conjunction base case —
    /// `Historically`/`Trigger` — `⊥` otherwise). Past operators never
    /// depend on the loop.
    fn past_pred(&mut self, enc: &mut Encoder, arena: &FormulaArena, node: FormulaId, t: usize, conjunctive: bool) -> BeId {
        if t > 0 {
            self.represent(enc, arena, node, t - 1)
        } else if conjunctive {
            enc.be().mk_true()
        } else {
            enc.be().mk_false()
        }
    }

    /// Conjoins every temporal node's defining equation at depth `t`.
    pub fn aux_constraints_at(&mut self, enc: &mut Encoder, arena: &FormulaArena, t: usize, k: usize, loop_key: Option<usize>) -> BeId {
        let mut acc = enc.be().mk_true();
        for f in self.temporal_nodes.clone() {
            let eq = self.defining_equation(enc, arena, f, t, k, loop_key);
            acc = enc.be_mut().and(acc, eq);
        }
        acc
    }
}
