//! Een–Sørensson (non-incremental, bounded-`k` induction): spec.md §4.7.2.
//!
//! At each `k` in `0..=k_max`, runs a *base* check (is there a
//! counterexample of length `k`?) and a *step* check (does the
//! transition preserve `phi` over any `k`-path with pairwise distinct
//! states?). The uniqueness constraint is approximated over *all*
//! current-state bits rather than the property's true cone-of-influence
//! — a real COI computation is outside this core's scope (see
//! `DESIGN.md`).

use bmc_be::BeId;
use bmc_encoder::Encoder;
use bmc_model::{TransitionSystem, Unroller};
use bmc_sat::SatSolver;

use crate::common::{phi_holds_before, states_differ};
use crate::property::Status;
use crate::sat_support::assert_true;
use crate::trace::{build_trace, Trace};

/// `AND_{i<j, i,j ∈ [0,k]} (states i and j differ on some current-state
/// bit)`.
fn uniqueness(enc: &mut Encoder, k: usize) -> BeId {
    let mut acc = enc.be().mk_true();
    for i in 0..=k {
        for j in (i + 1)..=k {
            let differ = states_differ(enc, i, j);
            acc = enc.be_mut().and(acc, differ);
        }
    }
    acc
}

/// Runs Een–Sørensson for `k = 0..=k_max`, returning the first
/// conclusive verdict (or `Unknown` if `k_max` is exhausted).
pub fn check_een_sorensson<S: SatSolver + Default>(
    enc: &mut Encoder,
    system: &TransitionSystem,
    phi: BeId,
    k_max: usize,
) -> (Status, Option<Trace>) {
    for k in 0..=k_max {
        log::debug!("een_sorensson: k={}", k);
        let mut unroller = Unroller::new(enc, system);
        let init0 = unroller.init_0();
        let unroll = unroller.unroll(0, k);
        drop(unroller);

        let prior = phi_holds_before(enc, phi, k);
        let phi_k = enc.untimed_expr_to_timed(phi, k);
        let not_phi_k = enc.be_mut().not(phi_k);

        // Base: Init_0 ∧ Unroll[0..k] ∧ prior ∧ ¬phi_k.
        let base_formula = {
            let a = enc.be_mut().and(init0, unroll);
            let b = enc.be_mut().and(a, prior);
            enc.be_mut().and(b, not_phi_k)
        };
        let mut base_sat = S::default();
        assert_true(enc.be_mut(), &mut base_sat, base_formula);
        if let Ok(bmc_sat::SolveResult::Sat(model)) = base_sat.solve() {
            log::info!("een_sorensson: base case falsified at k={}", k);
            let trace = build_trace(enc, &model, k, None);
            return (Status::False, Some(trace));
        }

        // Step: Unroll[0..k] ∧ prior ∧ ¬phi_k ∧ uniqueness(0..k).
        let unique = uniqueness(enc, k);
        let step_formula = {
            let a = enc.be_mut().and(unroll, prior);
            let b = enc.be_mut().and(a, not_phi_k);
            enc.be_mut().and(b, unique)
        };
        let mut step_sat = S::default();
        assert_true(enc.be_mut(), &mut step_sat, step_formula);
        if let Ok(bmc_sat::SolveResult::Unsat) = step_sat.solve() {
            log::info!("een_sorensson: step case proved invariant at k={}", k);
            return (Status::True, None);
        }
    }
    log::warn!("een_sorensson: k_max={} exhausted without a verdict", k_max);
    (Status::Unknown, None)
}
