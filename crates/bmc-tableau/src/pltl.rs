//! Past-time (PLTL) operators, evaluated as a range over `[0, t]` — the
//! history of a bounded path is always a concrete prefix, loop or no
//! loop, so unlike the future operators in `ltl.rs` none of these need a
//! loop-dependent case split (spec.md §4.5).
//!
//! This is a simplified rendition of the interval-sharing ("EvalSet")
//! optimization described for the past tableau: rather than representing
//! `[0, t]` ranges as compact intervals and sharing sub-computations
//! across them, each `(formula, t)` pair is memoized independently by the
//! shared [`crate::ltl::Tableau`] cache. Still correct, just without the
//! extra structural sharing (see `DESIGN.md`).
//!
//! `loop_key` is threaded through every function here purely so it can
//! be forwarded to `eval_rec` unchanged — none of the five past
//! operators ever branches on it or constructs a time index from it.
//! That is sound for any nesting, not just the flat formulas this
//! module's own tests cover: every recursive call in this file only
//! ever decreases `t` towards 0 (`eval_prev`'s `t - 1`, the `0..=t`
//! ranges in `eval_once`/`eval_historically`/`eval_since`/
//! `eval_trigger`), so no past operator, at any nesting depth or mixed
//! with future operators, can ever produce an index past `k` that would
//! need `loop_key` to resolve. The only operator that ever reads
//! `loop_key` is `ltl.rs`'s `eval_next`, and it is reached correctly
//! through the shared memoized recursion regardless of how deep inside
//! past operators a `Next` sits.

use crate::formula::FormulaId;
use crate::ltl::{LoopKey, Tableau};

impl<'a> Tableau<'a> {
    /// `[[Yf]]_t = [[f]]_{t-1}` if `t > 0`, else `⊥` — there is no state
    /// before the start of the path.
    pub(crate) fn eval_prev(&mut self, a: FormulaId, t: usize, k: usize, loop_key: LoopKey) -> bmc_be::BeId {
        if t == 0 {
            self.enc.be().mk_false()
        } else {
            self.eval_rec(a, t - 1, k, loop_key)
        }
    }

    /// `[[Of]]_t = OR_{i=0}^{t} [[f]]_i`.
    pub(crate) fn eval_once(&mut self, a: FormulaId, t: usize, k: usize, loop_key: LoopKey) -> bmc_be::BeId {
        let mut disj = self.enc.be().mk_false();
        for i in 0..=t {
            let ai = self.eval_rec(a, i, k, loop_key);
            disj = self.enc.be_mut().or(disj, ai);
        }
        disj
    }

    /// `[[Hf]]_t = AND_{i=0}^{t} [[f]]_i`.
    pub(crate) fn eval_historically(&mut self, a: FormulaId, t: usize, k: usize, loop_key: LoopKey) -> bmc_be::BeId {
        let mut conj = self.enc.be().mk_true();
        for i in 0..=t {
            let ai = self.eval_rec(a, i, k, loop_key);
            conj = self.enc.be_mut().and(conj, ai);
        }
        conj
    }

    /// `[[a S b]]_t = OR_{i=0}^{t} ( b_i ∧ AND_{j=i+1}^{t} a_j )`.
    pub(crate) fn eval_since(
        &mut self,
        a: FormulaId,
        b: FormulaId,
        t: usize,
        k: usize,
        loop_key: LoopKey,
    ) -> bmc_be::BeId {
        let mut suffix_and = self.enc.be().mk_true();
        let mut disj = self.enc.be().mk_false();
        for i in (0..=t).rev() {
            let bi = self.eval_rec(b, i, k, loop_key);
            let term = self.enc.be_mut().and(bi, suffix_and);
            disj = self.enc.be_mut().or(disj, term);
            let ai = self.eval_rec(a, i, k, loop_key);
            suffix_and = self.enc.be_mut().and(suffix_and, ai);
        }
        disj
    }

    /// `[[a T b]]_t = (AND_{i=0}^{t} b_i) ∨ OR_{i=0}^{t}( a_i ∧ AND_{j=i}^{t} b_j )`.
    pub(crate) fn eval_trigger(
        &mut self,
        a: FormulaId,
        b: FormulaId,
        t: usize,
        k: usize,
        loop_key: LoopKey,
    ) -> bmc_be::BeId {
        let mut suffix_and_b = self.enc.be().mk_true();
        let mut disj = self.enc.be().mk_false();
        for i in (0..=t).rev() {
            let bi = self.eval_rec(b, i, k, loop_key);
            suffix_and_b = self.enc.be_mut().and(bi, suffix_and_b);
            let ai = self.eval_rec(a, i, k, loop_key);
            let term = self.enc.be_mut().and(ai, suffix_and_b);
            disj = self.enc.be_mut().or(disj, term);
        }
        self.enc.be_mut().or(suffix_and_b, disj)
    }
}

#[cfg(test)]
mod tests {
    use crate::formula::FormulaArena;
    use crate::ltl::Tableau;
    use bmc_base::{Interner, LoopSelector};
    use bmc_encoder::{Encoder, VarKind};

    fn toy_encoder() -> (Encoder, bmc_encoder::LogIdx) {
        let mut interner = Interner::new();
        let mut enc = Encoder::new();
        let s = enc.declare(interner.intern("s"), VarKind::Curr);
        enc.commit_layer();
        (enc, s)
    }

    #[test]
    fn prev_at_time_zero_is_false() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let yf = arena.prev(fp);
        let mut t = Tableau::new(&mut enc, &arena);
        let v = t.eval(yf, 0, 2, LoopSelector::NoLoop);
        drop(t);
        assert_eq!(v, enc.be().mk_false());
    }

    #[test]
    fn once_is_disjunction_over_history() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let of = arena.once(fp);
        let mut t = Tableau::new(&mut enc, &arena);
        let v = t.eval(of, 1, 2, LoopSelector::NoLoop);
        drop(t);
        let p0 = enc.index_to_timed(VarKind::Curr, s, 0);
        let p1 = enc.index_to_timed(VarKind::Curr, s, 1);
        let expect = enc.be_mut().or(p0, p1);
        assert_eq!(v, expect);
    }

    #[test]
    fn historically_is_conjunction_over_history() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let hf = arena.historically(fp);
        let mut t = Tableau::new(&mut enc, &arena);
        let v = t.eval(hf, 1, 2, LoopSelector::NoLoop);
        drop(t);
        let p0 = enc.index_to_timed(VarKind::Curr, s, 0);
        let p1 = enc.index_to_timed(VarKind::Curr, s, 1);
        let expect = enc.be_mut().and(p0, p1);
        assert_eq!(v, expect);
    }

    #[test]
    fn since_holds_when_b_true_at_time_zero_and_a_holds_after() {
        let (mut enc, s) = toy_encoder();
        let mut arena = FormulaArena::new();
        let p = enc.untimed_var(VarKind::Curr, s);
        let fp = arena.prop(p);
        let top = arena.prop(enc.be().mk_true());
        let since = arena.since(top, fp);
        let mut t = Tableau::new(&mut enc, &arena);
        let v = t.eval(since, 0, 0, LoopSelector::NoLoop);
        drop(t);
        let p0 = enc.index_to_timed(VarKind::Curr, s, 0);
        assert_eq!(v, p0);
    }
}
