//! Classic (k-induction base case, non-incremental): spec.md §4.7.2.
//!
//! Checks `(Init_0 ∧ ¬φ_0) ∨ (Trans_{0,1} ∧ φ_0 ∧ ¬φ_1)` unsatisfiable —
//! a single SAT call with a fresh solver, no incremental state kept
//! across invocations.

use bmc_be::BeId;
use bmc_encoder::{Encoder, VarKind};
use bmc_model::{TransitionSystem, Unroller};
use bmc_sat::SatSolver;

use crate::property::Status;
use crate::sat_support::assert_true;
use crate::trace::{build_trace, Trace};

/// Runs the Classic check for invariant `phi` (an untimed Boolean
/// expression) against `system`, using a freshly-constructed `sat`
/// solver. Returns the verdict and, on `False`, a length-1 counterexample.
pub fn check_classic<S: SatSolver + Default>(
    enc: &mut Encoder,
    system: &TransitionSystem,
    phi: BeId,
) -> (Status, Option<Trace>) {
    log::debug!("classic: checking invariant at k=0,1");
    let mut unroller = Unroller::new(enc, system);
    let init0 = unroller.init_0();
    let trans01 = unroller.trans_at(0);
    drop(unroller);

    let phi0 = enc.untimed_expr_to_timed(phi, 0);
    let phi1 = enc.untimed_expr_to_timed(phi, 1);
    let not_phi0 = enc.be_mut().not(phi0);
    let not_phi1 = enc.be_mut().not(phi1);

    let base = enc.be_mut().and(init0, not_phi0);
    let inductive = {
        let step_ok = enc.be_mut().and(trans01, phi0);
        enc.be_mut().and(step_ok, not_phi1)
    };
    let disjunction = enc.be_mut().or(base, inductive);

    let mut sat = S::default();
    assert_true(enc.be_mut(), &mut sat, disjunction);
    match sat.solve() {
        Ok(bmc_sat::SolveResult::Unsat) => {
            log::info!("classic: property holds (unsat)");
            (Status::True, None)
        }
        Ok(bmc_sat::SolveResult::Sat(model)) => {
            log::info!("classic: property falsified");
            let trace = build_trace(enc, &model, 1, None);
            (Status::False, Some(trace))
        }
        Err(e) => {
            log::warn!("classic: SAT back-end failure: {}", e);
            (Status::Unknown, None)
        }
    }
}
