//! The SBMC (linear-size) LTL driver: spec.md §4.6/§4.7.1, an
//! alternate encoding of the same `Path_with_init[0..i] ∧
//! Tableau(¬φ, i, l)` check `ltl_driver.rs` performs, built on
//! `bmc-tableau`'s auxiliary-variable tableau instead of the direct
//! range-formula one. Shares `loop_candidates`/`bounds_to_visit` with
//! `ltl_driver.rs` so both encodings visit the same bounds and loop
//! positions for a given `(k, l_rel)` request.

use bmc_encoder::Encoder;
use bmc_model::{TransitionSystem, Unroller};
use bmc_sat::{IncrementalSatSolver, SatSolver, SolveResult};

use bmc_base::LoopSelector;
use bmc_tableau::{FormulaArena, FormulaId, SbmcBuilder};

use crate::common::loop_condition;
use crate::ltl_driver::{bounds_to_visit, loop_candidates, RelativeLoop};
use crate::property::Status;
use crate::sat_support::{assert_in_group, assert_true};
use crate::trace::{build_trace, Trace};

fn aux_constraints_over(
    enc: &mut Encoder,
    arena: &FormulaArena,
    builder: &mut SbmcBuilder,
    not_phi: FormulaId,
    i: usize,
    loop_sel: LoopSelector,
) -> bmc_be::BeId {
    let loop_key = match loop_sel {
        LoopSelector::At(l) => Some(l),
        LoopSelector::NoLoop => None,
        LoopSelector::All => unreachable!("loop_candidates never yields All"),
    };
    let mut acc = enc.be().mk_true();
    for t in 0..=i {
        let constraints = builder.aux_constraints_at(enc, arena, t, i, loop_key);
        acc = enc.be_mut().and(acc, constraints);
    }
    let root_true = builder.represent(enc, arena, not_phi, 0);
    let mut formula = enc.be_mut().and(acc, root_true);
    if let LoopSelector::At(l) = loop_sel {
        let lc = loop_condition(enc, l, i);
        formula = enc.be_mut().and(formula, lc);
    }
    formula
}

/// Non-incremental SBMC-encoded LTL driver: a fresh solver per bound,
/// one [`SbmcBuilder`] shared across every bound so its `el` variables
/// (keyed by `(formula, time)`) are never reallocated as `i` grows.
pub fn check_ltl_sbmc_non_incremental<S: SatSolver + Default>(
    enc: &mut Encoder,
    system: &TransitionSystem,
    arena: &mut FormulaArena,
    phi: FormulaId,
    k: usize,
    l_rel: RelativeLoop,
    grow_length: bool,
) -> (Status, Option<Trace>) {
    let not_phi = arena.not(phi);
    let mut builder = SbmcBuilder::new(arena, not_phi);

    for i in bounds_to_visit(k, grow_length) {
        let Some(candidates) = loop_candidates(l_rel, i) else {
            log::debug!("sbmc_driver: skipping i={}, loop position out of range", i);
            continue;
        };

        let path = {
            let mut unroller = Unroller::new(enc, system);
            let init0 = unroller.init_0();
            let unroll = unroller.unroll(0, i);
            enc.be_mut().and(init0, unroll)
        };

        for loop_sel in candidates {
            log::debug!("sbmc_driver: non-incremental i={}, loop={:?}", i, loop_sel);
            let encoded = aux_constraints_over(enc, arena, &mut builder, not_phi, i, loop_sel);
            let formula = enc.be_mut().and(path, encoded);

            let mut sat = S::default();
            assert_true(enc.be_mut(), &mut sat, formula);
            match sat.solve() {
                Ok(SolveResult::Sat(model)) => {
                    log::info!("sbmc_driver: counterexample of length {}", i);
                    let loopback = match loop_sel {
                        LoopSelector::At(l) => Some(l),
                        _ => None,
                    };
                    let trace = build_trace(enc, &model, i, loopback);
                    return (Status::False, Some(trace));
                }
                Ok(SolveResult::Unsat) => {}
                Err(e) => {
                    log::warn!("sbmc_driver: SAT back-end failure: {}", e);
                    return (Status::Unknown, None);
                }
            }
        }
    }
    (Status::True, None)
}

/// Incremental SBMC-encoded LTL driver: one solver, `Init_0` and
/// `Unroll[prev..i]` accumulated permanently, the per-bound SBMC
/// encoding pushed into a throwaway group.
pub fn check_ltl_sbmc_incremental<S: IncrementalSatSolver + Default>(
    enc: &mut Encoder,
    system: &TransitionSystem,
    arena: &mut FormulaArena,
    phi: FormulaId,
    k: usize,
    l_rel: RelativeLoop,
    grow_length: bool,
) -> (Status, Option<Trace>) {
    let not_phi = arena.not(phi);
    let mut builder = SbmcBuilder::new(arena, not_phi);
    let mut sat = S::default();
    let perm = sat.permanent_group();
    let mut prev_i = 0usize;
    let mut first = true;

    for i in bounds_to_visit(k, grow_length) {
        let Some(candidates) = loop_candidates(l_rel, i) else {
            log::debug!("sbmc_driver: skipping i={}, loop position out of range", i);
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
            log::debug!("sbmc_driver: incremental i={}, loop={:?}", i, loop_sel);
            let temp_group = sat.create_group();
            let encoded = aux_constraints_over(enc, arena, &mut builder, not_phi, i, loop_sel);
            assert_in_group(enc.be_mut(), &mut sat, temp_group, encoded, true);
            match sat.solve_all_groups() {
                Ok(SolveResult::Sat(model)) => {
                    log::info!("sbmc_driver: counterexample of length {}", i);
                    let loopback = match loop_sel {
                        LoopSelector::At(l) => Some(l),
                        _ => None,
                    };
                    let trace = build_trace(enc, &model, i, loopback);
                    return (Status::False, Some(trace));
                }
                Ok(SolveResult::Unsat) => {}
                Err(e) => {
                    log::warn!("sbmc_driver: SAT back-end failure: {}", e);
                    return (Status::Unknown, None);
                }
            }
            sat.destroy_group(temp_group);
        }
    }
    (Status::True, None)
}
