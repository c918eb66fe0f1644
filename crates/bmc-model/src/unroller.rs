//! The unroller: produces `Init_0`, `Invar@t`, `Trans@t`, and `Unroll[j..k]`
//! path formulas, plus the `(k,l)`-loop fairness encoding (spec.md §4.3).

use bmc_base::LoopSelector;
use bmc_be::BeId;
use bmc_encoder::Encoder;

use crate::system::TransitionSystem;

pub struct Unroller<'a> {
    enc: &'a mut Encoder,
    system: &'a TransitionSystem,
}

impl<'a> Unroller<'a> {
    pub fn new(enc: &'a mut Encoder, system: &'a TransitionSystem) -> Self {
        Unroller { enc, system }
    }

    /// `Init_0`: the initial-state constraint placed at time 0.
    pub fn init_0(&mut self) -> BeId {
        self.enc.untimed_expr_to_timed(self.system.init, 0)
    }

    /// `Invar@t`: the state invariant placed at time `t`.
    pub fn invar_at(&mut self, t: usize) -> BeId {
        self.enc.untimed_expr_to_timed(self.system.invar, t)
    }

    /// `Trans@t`: the transition relation between time `t` and `t+1`.
    pub fn trans_at(&mut self, t: usize) -> BeId {
        self.enc.untimed_expr_to_times(self.system.trans, t, t + 1)
    }

    /// `Unroll[j..k]`: `Trans` for every step in `[j, k)` conjoined with
    /// `Invar` for every state in `[j, k]`.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if `j > k`.
    pub fn unroll(&mut self, j: usize, k: usize) -> BeId {
        assert!(j <= k, "contract violation: unroll requires j <= k");
        let mut acc = self.enc.be().mk_true();
        for t in j..=k {
            let inv = self.invar_at(t);
            acc = self.enc.be_mut().and(acc, inv);
        }
        for t in j..k {
            let tr = self.trans_at(t);
            acc = self.enc.be_mut().and(acc, tr);
        }
        acc
    }

    /// `Path_no_init(k)`: `Unroll[0..k]` without constraining the initial
    /// state.
    pub fn path_no_init(&mut self, k: usize) -> BeId {
        self.unroll(0, k)
    }

    /// `Path_with_init(k)`: `Init_0 ∧ Unroll[0..k]`.
    pub fn path_with_init(&mut self, k: usize) -> BeId {
        let init = self.init_0();
        let path = self.unroll(0, k);
        self.enc.be_mut().and(init, path)
    }

    /// `Fairness(k, l)`: every fairness constraint holds at some point in
    /// the loop `[l, k]`. Fairness constraints are vacuously satisfied on
    /// a path with no loop — there is no infinite suffix for them to
    /// constrain (matches the NuSMV convention that only looping paths
    /// are subject to fairness).
    pub fn fairness(&mut self, k: usize, loop_sel: LoopSelector) -> BeId {
        let l = match loop_sel {
            LoopSelector::At(l) => l,
            LoopSelector::NoLoop => return self.enc.be().mk_true(),
            LoopSelector::All => {
                panic!("contract violation: fairness requires a concrete loop position, not All")
            }
        };
        let mut acc = self.enc.be().mk_true();
        for f in self.system.fairness.clone() {
            let mut disj = self.enc.be().mk_false();
            for t in l..=k {
                let ft = self.enc.untimed_expr_to_timed(f, t);
                disj = self.enc.be_mut().or(disj, ft);
            }
            acc = self.enc.be_mut().and(acc, disj);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmc_base::Interner;
    use bmc_encoder::VarKind;

    fn toy_system(enc: &mut Encoder) -> (TransitionSystem, bmc_encoder::LogIdx) {
        let mut interner = Interner::new();
        let s = enc.declare(interner.intern("s"), VarKind::Curr);
        enc.commit_layer();
        let init = enc.untimed_var(VarKind::Curr, s);
        let curr = enc.untimed_var(VarKind::Curr, s);
        let next = enc.untimed_var(VarKind::Next, s);
        let trans = enc.be_mut().iff(curr, next);
        let invar = enc.be().mk_true();
        (TransitionSystem::new(init, trans, invar, Vec::new()), s)
    }

    #[test]
    fn init_0_matches_direct_timed_lookup() {
        let mut enc = Encoder::new();
        let (system, s) = toy_system(&mut enc);
        let mut unroller = Unroller::new(&mut enc, &system);
        let init0 = unroller.init_0();
        drop(unroller);
        let direct = enc.index_to_timed(VarKind::Curr, s, 0);
        assert_eq!(init0, direct);
    }

    #[test]
    fn unroll_with_zero_steps_is_just_invar_at_zero() {
        let mut enc = Encoder::new();
        let (system, _s) = toy_system(&mut enc);
        let mut unroller = Unroller::new(&mut enc, &system);
        let u = unroller.unroll(0, 0);
        drop(unroller);
        assert_eq!(u, enc.be().mk_true());
    }

    #[test]
    #[should_panic(expected = "j <= k")]
    fn unroll_rejects_j_greater_than_k() {
        let mut enc = Encoder::new();
        let (system, _s) = toy_system(&mut enc);
        let mut unroller = Unroller::new(&mut enc, &system);
        unroller.unroll(3, 1);
    }

    #[test]
    fn fairness_with_no_loop_is_vacuously_true() {
        let mut enc = Encoder::new();
        let (mut system, s) = toy_system(&mut enc);
        let f = enc.untimed_var(VarKind::Curr, s);
        system.fairness.push(f);
        let mut unroller = Unroller::new(&mut enc, &system);
        let fair = unroller.fairness(3, LoopSelector::NoLoop);
        drop(unroller);
        assert_eq!(fair, enc.be().mk_true());
    }

    #[test]
    fn fairness_with_loop_is_disjunction_over_loop_range() {
        let mut enc = Encoder::new();
        let (mut system, s) = toy_system(&mut enc);
        let f = enc.untimed_var(VarKind::Curr, s);
        system.fairness.push(f);
        let mut unroller = Unroller::new(&mut enc, &system);
        let fair = unroller.fairness(2, LoopSelector::At(0));
        drop(unroller);
        let f0 = enc.index_to_timed(VarKind::Curr, s, 0);
        let f1 = enc.index_to_timed(VarKind::Curr, s, 1);
        let f2 = enc.index_to_timed(VarKind::Curr, s, 2);
        let expect = {
            let or01 = enc.be_mut().or(f0, f1);
            enc.be_mut().or(or01, f2)
        };
        assert_eq!(fair, expect);
    }
}
