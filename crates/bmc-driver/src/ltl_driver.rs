//! The LTL bounded-model-checking driver: spec.md §4.7.1.
//!
//! Iterates bounds `i` (either the single fixed bound `k`, or every
//! bound `0..=k` when `grow_length` is set), resolves the caller's
//! loop request to a concrete [`LoopSelector`] at each `i`, and checks
//! `Path_with_init[0..i] ∧ Tableau(¬φ, i, l)` for satisfiability — a
//! fresh solver per bound in the non-incremental driver, or one
//! solver with `Init_0`/`Unroll` accumulated permanently and the
//! tableau pushed into a temporary group in the incremental one.

use bmc_encoder::Encoder;
use bmc_model::{TransitionSystem, Unroller};
use bmc_sat::{IncrementalSatSolver, SatSolver, SolveResult};

use bmc_base::LoopSelector;
use bmc_tableau::{FormulaArena, FormulaId, Tableau};

use crate::common::loop_condition;
use crate::property::Status;
use crate::sat_support::{assert_in_group, assert_true};
use crate::trace::{build_trace, Trace};

/// The loop position the caller asked for, relative to each bound `i`
/// the driver visits (spec.md §4.7.1's `l_rel`).
#[derive(Debug, Clone, Copy)]
pub enum RelativeLoop {
    NoLoop,
    All,
    /// Resolves to `i as i64 + offset` at each bound `i`; out-of-range
    /// results (negative, or `>= i`) cause that bound to be skipped.
    Offset(i64),
}

/// Folds spec.md's `abs_loop(l_rel, i)` together with its companion
/// skip check ("if l is single-loop and (l ≥ i or l < 0): skip") into
/// one call: `None` means skip this bound entirely, `Some(candidates)`
/// gives every concrete loop selection to try at this bound, in order.
///
/// `RelativeLoop::All` is spec.md §4.4.2's all-loops disjunction
/// `T^∅ ∨ OR_{l=0}^{k-1}(loop(k,l) ∧ T^L_0(φ))`: the no-loop case plus
/// every `l` in `[0, i)`. At `i = 0` that range is empty, so it reduces
/// to just the no-loop case, matching spec.md's documented boundary.
pub(crate) fn loop_candidates(l_rel: RelativeLoop, i: usize) -> Option<Vec<LoopSelector>> {
    match l_rel {
        RelativeLoop::NoLoop => Some(vec![LoopSelector::NoLoop]),
        RelativeLoop::All => {
            let mut candidates = vec![LoopSelector::NoLoop];
            candidates.extend((0..i).map(LoopSelector::At));
            Some(candidates)
        }
        RelativeLoop::Offset(offset) => {
            let l = i as i64 + offset;
            if l < 0 || l as usize >= i.max(1) {
                None
            } else {
                Some(vec![LoopSelector::At(l as usize)])
            }
        }
    }
}

pub(crate) fn bounds_to_visit(k: usize, grow_length: bool) -> Vec<usize> {
    if grow_length {
        (0..=k).collect()
    } else {
        vec![k]
    }
}

/// `Tableau(¬φ, i, loop_sel)`, conjoined with the `loop(k,l)` state
/// equality whenever `loop_sel` names a concrete loop-back point — the
/// tableau's `Next`-wraps-to-`l` substitution only gives the right
/// truth value *assuming* the path is periodic; this conjunct is what
/// actually forces it to be.
fn tableau_with_loop_condition(
    enc: &mut Encoder,
    arena: &FormulaArena,
    not_phi: FormulaId,
    i: usize,
    loop_sel: LoopSelector,
) -> bmc_be::BeId {
    let mut tableau = Tableau::new(enc, arena);
    let encoded = tableau.eval(not_phi, 0, i, loop_sel);
    drop(tableau);
    match loop_sel {
        LoopSelector::At(l) => {
            let lc = loop_condition(enc, l, i);
            enc.be_mut().and(encoded, lc)
        }
        _ => encoded,
    }
}

/// Non-incremental LTL driver: a fresh solver per bound.
pub fn check_ltl_non_incremental<S: SatSolver + Default>(
    enc: &mut Encoder,
    system: &TransitionSystem,
    arena: &mut FormulaArena,
    phi: FormulaId,
    k: usize,
    l_rel: RelativeLoop,
    grow_length: bool,
) -> (Status, Option<Trace>) {
    let not_phi = arena.not(phi);
    for i in bounds_to_visit(k, grow_length) {
        let Some(candidates) = loop_candidates(l_rel, i) else {
            log::debug!("ltl_driver: skipping i={}, loop position out of range", i);
            continue;
        };

        let path = {
            let mut unroller = Unroller::new(enc, system);
            let init0 = unroller.init_0();
            let unroll = unroller.unroll(0, i);
            enc.be_mut().and(init0, unroll)
        };

        for loop_sel in candidates {
            log::debug!("ltl_driver: non-incremental i={}, loop={:?}", i, loop_sel);
            let encoded = tableau_with_loop_condition(enc, arena, not_phi, i, loop_sel);
            let formula = enc.be_mut().and(path, encoded);

            let mut sat = S::default();
            assert_true(enc.be_mut(), &mut sat, formula);
            match sat.solve() {
                Ok(SolveResult::Sat(model)) => {
                    log::info!("ltl_driver: counterexample of length {}", i);
                    let loopback = match loop_sel {
                        LoopSelector::At(l) => Some(l),
                        _ => None,
                    };
                    let trace = build_trace(enc, &model, i, loopback);
                    return (Status::False, Some(trace));
                }
                Ok(SolveResult::Unsat) => {}
                Err(e) => {
                    log::warn!("ltl_driver: SAT back-end failure: {}", e);
                    return (Status::Unknown, None);
                }
            }
        }
    }
    (Status::True, None)
}

/// Incremental LTL driver: one solver, `Init_0` and `Unroll[prev..i]`
/// accumulated permanently, the tableau for each bound pushed into a
/// throwaway group.
pub fn check_ltl_incremental<S: IncrementalSatSolver + Default>(
    enc: &mut Encoder,
    system: &TransitionSystem,
    arena: &mut FormulaArena,
    phi: FormulaId,
    k: usize,
    l_rel: RelativeLoop,
    grow_length: bool,
) -> (Status, Option<Trace>) {
    let not_phi = arena.not(phi);
    let mut sat = S::default();
    let perm = sat.permanent_group();
    let mut prev_i = 0usize;
    let mut first = true;

    for i in bounds_to_visit(k, grow_length) {
        let Some(candidates) = loop_candidates(l_rel, i) else {
            log::debug!("ltl_driver: skipping i={}, loop position out of range", i);
            continue;
        };

        if first {
            let mut unroller = Unroller::new(enc, system);
            let init0 = unroller.init_0();
            drop(unroller);
            assert_in_group(enc.be_mut(), &mut sat, perm, init0, true);
            first = false;
        }
        {
            let mut unroller = Unroller::new(enc, system);
            let unroll = unroller.unroll(prev_i, i);
            drop(unroller);
            assert_in_group(enc.be_mut(), &mut sat, perm, unroll, true);
        }
        prev_i = i;

        for loop_sel in candidates {
            log::debug!("ltl_driver: incremental i={}, loop={:?}", i, loop_sel);
            let temp_group = sat.create_group();
            let encoded = tableau_with_loop_condition(enc, arena, not_phi, i, loop_sel);
            assert_in_group(enc.be_mut(), &mut sat, temp_group, encoded, true);
            match sat.solve_all_groups() {
                Ok(SolveResult::Sat(model)) => {
                    log::info!("ltl_driver: counterexample of length {}", i);
                    let loopback = match loop_sel {
                        LoopSelector::At(l) => Some(l),
                        _ => None,
                    };
                    let trace = build_trace(enc, &model, i, loopback);
                    return (Status::False, Some(trace));
                }
                Ok(SolveResult::Unsat) => {}
                Err(e) => {
                    log::warn!("ltl_driver: SAT back-end failure: {}", e);
                    return (Status::Unknown, None);
                }
            }
            sat.destroy_group(temp_group);
        }
    }
    (Status::True, None)
}
