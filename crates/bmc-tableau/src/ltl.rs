//! The LTL tableau: translates a future-time formula into a Boolean
//! expression over a bounded `(k,l)`-path, memoized per `(formula, t, k,
//! loop)` (spec.md §4.4).
//!
//! Only [`FormulaNode::Next`] depends on the loop position directly — it
//! is the only operator whose successor state can wrap around to `l`.
//! Every other operator is defined as a range over `[t, k]` (or, for past
//! operators, `[0, t]`; see `pltl.rs`), which is why the translation is
//! identical whether or not the path loops: the loop only changes what a
//! `Next` one step past `k` resolves to, and that difference propagates
//! upward automatically through the memoized recursion.

use std::collections::HashMap;

use bmc_base::LoopSelector;
use bmc_be::BeId;
use bmc_encoder::Encoder;

use crate::formula::{FormulaArena, FormulaId, FormulaNode};

pub(crate) type LoopKey = Option<usize>;
pub(crate) type MemoKey = (FormulaId, usize, usize, LoopKey);

/// Evaluates formulas against a bounded path, caching every
/// `(formula, time, bound, loop)` result it computes.
pub struct Tableau<'a> {
    pub(crate) enc: &'a mut Encoder,
    pub(crate) arena: &'a FormulaArena,
    pub(crate) memo: HashMap<MemoKey, BeId>,
}

impl<'a> Tableau<'a> {
    pub fn new(enc: &'a mut Encoder, arena: &'a FormulaArena) -> Self {
        Tableau {
            enc,
            arena,
            memo: HashMap::new(),
        }
    }

    /// Translates `f` at time `t` over a path of bound `k` with the given
    /// loop selector.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if `loop_sel` is [`LoopSelector::All`] (the caller must
    /// enumerate concrete loop positions itself), if `t > k`, or if the
    /// loop position exceeds `k`.
    pub fn eval(&mut self, f: FormulaId, t: usize, k: usize, loop_sel: LoopSelector) -> BeId {
        let loop_key = match loop_sel {
            LoopSelector::NoLoop => None,
            LoopSelector::At(l) => Some(l),
            LoopSelector::All => {
                panic!("contract violation: Tableau::eval requires a concrete loop position, not All")
            }
        };
        assert!(t <= k, "contract violation: t must lie within [0, k]");
        if let Some(l) = loop_key {
            assert!(l <= k, "contract violation: loop position must be <= k");
        }
        self.eval_rec(f, t, k, loop_key)
    }

    pub(crate) fn eval_rec(&mut self, f: FormulaId, t: usize, k: usize, loop_key: LoopKey) -> BeId {
        if let Some(&cached) = self.memo.get(&(f, t, k, loop_key)) {
            return cached;
        }
        let result = match self.arena.node(f) {
            FormulaNode::Prop(e) => self.enc.untimed_expr_to_timed(e, t),
            FormulaNode::Not(a) => {
                let av = self.eval_rec(a, t, k, loop_key);
                self.enc.be_mut().not(av)
            }
            FormulaNode::And(a, b) => {
                let av = self.eval_rec(a, t, k, loop_key);
                let bv = self.eval_rec(b, t, k, loop_key);
                self.enc.be_mut().and(av, bv)
            }
            FormulaNode::Or(a, b) => {
                let av = self.eval_rec(a, t, k, loop_key);
                let bv = self.eval_rec(b, t, k, loop_key);
                self.enc.be_mut().or(av, bv)
            }
            FormulaNode::Next(a) => self.eval_next(a, t, k, loop_key),
            FormulaNode::Future(a) => self.eval_or_range(a, t, k, loop_key),
            FormulaNode::Globally(a) => self.eval_and_range(a, t, k, loop_key),
            FormulaNode::Until(a, b) => self.eval_until(a, b, t, k, loop_key),
            FormulaNode::Release(a, b) => self.eval_release(a, b, t, k, loop_key),
            FormulaNode::Prev(a) => self.eval_prev(a, t, k, loop_key),
            FormulaNode::Once(a) => self.eval_once(a, t, k, loop_key),
            FormulaNode::Historically(a) => self.eval_historically(a, t, k, loop_key),
            FormulaNode::Since(a, b) => self.eval_since(a, b, t, k, loop_key),
            FormulaNode::Trigger(a, b) => self.eval_trigger(a, b, t, k, loop_key),
        };
        self.memo.insert((f, t, k, loop_key), result);
        result
    }

    fn eval_next(&mut self, a: FormulaId, t: usize, k: usize, loop_key: LoopKey) -> BeId {
        if t < k {
            self.eval_rec(a, t + 1, k, loop_key)
        } else {
            match loop_key {
                Some(l) => self.eval_rec(a, l, k, loop_key),
                None => self.enc.be().mk_false(),
            }
        }
    }

    /// `OR_{i=t}^{k} [[a]]_i`.
    fn eval_or_range(&mut self, a: FormulaId, t: usize, k: usize, loop_key: LoopKey) -> BeId {
        let mut disj = self.enc.be().mk_false();
        for i in t..=k {
            let ai = self.eval_rec(a, i, k, loop_key);
            disj = self.enc.be_mut().or(disj, ai);
        }
        disj
    }

    /// `AND_{i=t}^{k} [[a]]_i`.
    fn eval_and_range(&mut self, a: FormulaId, t: usize, k: usize, loop_key: LoopKey) -> BeId {
        let mut conj = self.enc.be().mk_true();
        for i in t..=k {
            let ai = self.eval_rec(a, i, k, loop_key);
            conj = self.enc.be_mut().and(conj, ai);
        }
        conj
    }

    /// `[[a U b]]_t = OR_{i=t}^{k} ( b_i ∧ AND_{j=t}^{i-1} a_j )`.
    fn eval_until(&mut self, a: FormulaId, b: FormulaId, t: usize, k: usize, loop_key: LoopKey) -> BeId {
        let mut prefix_and = self.enc.be().mk_true();
        let mut disj = self.enc.be().mk_false();
        for i in t..=k {
            let bi = self.eval_rec(b, i, k, loop_key);
            let term = self.enc.be_mut().and(prefix_and, bi);
            disj = self.enc.be_mut().or(disj, term);
            let ai = self.eval_rec(a, i, k, loop_key);
            prefix_and = self.enc.be_mut().and(prefix_and, ai);
        }
        disj
    }

    /// `[[a R b]]_t = (AND_{i=t}^{k} b_i) ∨ OR_{i=t}^{k}( a_i ∧ AND_{j=t}^{i} b_j )`.
    fn eval_release(&mut self, a: FormulaId, b: FormulaId, t: usize, k: usize, loop_key: LoopKey) -> BeId {
        let mut prefix_and_b = self.enc.be().mk_true();
        let mut disj = self.enc.be().mk_false();
        for i in t..=k {
            let bi = self.eval_rec(b, i, k, loop_key);
            prefix_and_b = self.enc.be_mut().and(prefix_and_b, bi);
            let ai = self.eval_rec(a, i, k, loop_key);
            let term = self.enc.be_mut().and(ai, prefix_and_b);
            disj = self.enc.be_mut().or(disj, term);
        }
        self.enc.be_mut().or(prefix_and_b, disj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::FormulaArena;
    use bmc_base::Interner;
    use bmc_encoder::{Encoder, VarKind};

    fn toy_encoder() -> (Encoder, bmc_encoder::LogIdx) {
        let mut interner = Interner::new();
        let mut enc = Encoder::new();
        let s = enc.declare(interner.intern("s"), VarKind::Curr);
        enc.commit_layer();
        (enc, s)
    }

    #[test]
    fn next_at_bound_with_no_loop_is_false() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let xf = arena.next(fp);
        let mut t = Tableau::new(&mut enc, &arena);
        let v = t.eval(xf, 2, 2, LoopSelector::NoLoop);
        drop(t);
        assert_eq!(v, enc.be().mk_false());
    }

    #[test]
    fn next_at_bound_with_loop_wraps_to_l() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let xf = arena.next(fp);
        let mut t = Tableau::new(&mut enc, &arena);
        let v = t.eval(xf, 2, 2, LoopSelector::At(1));
        drop(t);
        let expect = enc.index_to_timed(VarKind::Curr, s, 1);
        assert_eq!(v, expect);
    }

    #[test]
    fn future_is_disjunction_over_remaining_states() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let ff = arena.future(fp);
        let mut t = Tableau::new(&mut enc, &arena);
        let v = t.eval(ff, 0, 1, LoopSelector::NoLoop);
        drop(t);
        let p0 = enc.index_to_timed(VarKind::Curr, s, 0);
        let p1 = enc.index_to_timed(VarKind::Curr, s, 1);
        let expect = enc.be_mut().or(p0, p1);
        assert_eq!(v, expect);
    }

    #[test]
    fn globally_is_conjunction_over_remaining_states() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let gf = arena.globally(fp);
        let mut t = Tableau::new(&mut enc, &arena);
        let v = t.eval(gf, 0, 1, LoopSelector::NoLoop);
        drop(t);
        let p0 = enc.index_to_timed(VarKind::Curr, s, 0);
        let p1 = enc.index_to_timed(VarKind::Curr, s, 1);
        let expect = enc.be_mut().and(p0, p1);
        assert_eq!(v, expect);
    }

    #[test]
    fn until_holds_when_b_true_immediately() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let top = arena.prop(enc.be().mk_true());
        let until = arena.until(top, fp);
        let mut t = Tableau::new(&mut enc, &arena);
        let v = t.eval(until, 0, 0, LoopSelector::NoLoop);
        drop(t);
        let p0 = enc.index_to_timed(VarKind::Curr, s, 0);
        assert_eq!(v, p0);
    }

    #[test]
    #[should_panic(expected = "not All")]
    fn eval_rejects_all_loop_selector() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let mut t = Tableau::new(&mut enc, &arena);
        t.eval(fp, 0, 0, LoopSelector::All);
    }
}
