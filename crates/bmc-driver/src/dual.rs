//! Dual (incremental, forward or backward closure): spec.md §4.7.2.
//!
//! Runs two independent incremental solvers at the same growing bound
//! `n`: a *base* solver (Init-rooted, identical in spirit to ZigZag's
//! base half) and a *step* solver that tries to prove the property
//! inductively via one of two closures:
//!
//! - **Forward**: accumulates `Invar@{i-1} ∧ Trans@{i-1} ∧ Invar@i ∧
//!   phi_{i-1}` for `i = 1..=n` and asks whether `¬phi_n` is reachable
//!   through it.
//! - **Backward**: reuses the same `Trans` relation but places its
//!   `Curr`/`Next` halves at swapped times (`untimed_expr_to_times`
//!   does not require `t_curr < t_next`), which reads the relation in
//!   reverse — valid only when there are no input variables, since an
//!   input's assignment cannot be "inverted" along with the state
//!   transition (spec.md §4.7.2's stated restriction).
//!
//! Whichever solver concludes first decides the verdict; `n` grows
//! until one does or `n_max` is exhausted.
//!
//! The uniqueness ranges are collapsed to `[0, n]` for both directions
//! (spec.md's literal `[1, n+1]` for backward is an indexing artifact
//! of counting from the bug state outward; our state numbering starts
//! at the base bound instead — see `DESIGN.md`).

use bmc_be::BeId;
use bmc_encoder::{Encoder, VarMask};
use bmc_model::{TransitionSystem, Unroller};
use bmc_sat::{IncrementalSatSolver, SolveResult};

use crate::common::states_differ;
use crate::error::{DriverError, DriverResult};
use crate::property::Status;
use crate::sat_support::assert_in_group;
use crate::trace::{build_trace, Trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DualDirection {
    Forward,
    Backward,
}

pub fn check_dual<S: IncrementalSatSolver + Default>(
    enc: &mut Encoder,
    system: &TransitionSystem,
    phi: BeId,
    direction: DualDirection,
    n_max: usize,
) -> DriverResult<(Status, Option<Trace>)> {
    if direction == DualDirection::Backward && enc.iter_vars(VarMask::INPUT).next().is_some() {
        log::warn!("dual: backward closure declines, system has input variables");
        return Err(DriverError::BackwardWithInputs);
    }

    let mut base_sat = S::default();
    let init0 = {
        let mut unroller = Unroller::new(enc, system);
        unroller.init_0()
    };
    {
        let perm = base_sat.permanent_group();
        assert_in_group(enc.be_mut(), &mut base_sat, perm, init0, true);
    }

    let mut step_sat = S::default();

    for n in 0..=n_max {
        log::debug!("dual ({:?}): n={}", direction, n);
        let phi_n = enc.untimed_expr_to_timed(phi, n);
        let not_phi_n = enc.be_mut().not(phi_n);

        // Base half.
        let base_group = base_sat.create_group();
        assert_in_group(enc.be_mut(), &mut base_sat, base_group, not_phi_n, true);
        match base_sat.solve_all_groups() {
            Ok(SolveResult::Sat(model)) => {
                log::info!("dual: base falsified at n={}", n);
                let trace = build_trace(enc, &model, n, None);
                return Ok((Status::False, Some(trace)));
            }
            Err(e) => {
                log::warn!("dual: base SAT back-end failure: {}", e);
                return Ok((Status::Unknown, None));
            }
            Ok(SolveResult::Unsat) => {}
        }
        base_sat.destroy_group(base_group);
        {
            let mut unroller = Unroller::new(enc, system);
            let trans_n = unroller.trans_at(n);
            let invar_n1 = unroller.invar_at(n + 1);
            let step = enc.be_mut().and(trans_n, invar_n1);
            let perm = base_sat.permanent_group();
            assert_in_group(enc.be_mut(), &mut base_sat, perm, step, true);
        }

        // Step half: the closure-specific inductive check.
        if n >= 1 {
            let link = match direction {
                DualDirection::Forward => {
                    let mut unroller = Unroller::new(enc, system);
                    let invar_prev = unroller.invar_at(n - 1);
                    let trans_prev = unroller.trans_at(n - 1);
                    let invar_here = unroller.invar_at(n);
                    drop(unroller);
                    let phi_prev = enc.untimed_expr_to_timed(phi, n - 1);
                    let a = enc.be_mut().and(invar_prev, trans_prev);
                    let b = enc.be_mut().and(a, invar_here);
                    enc.be_mut().and(b, phi_prev)
                }
                DualDirection::Backward => enc.untimed_expr_to_times(system.trans, n, n - 1),
            };
            let perm = step_sat.permanent_group();
            assert_in_group(enc.be_mut(), &mut step_sat, perm, link, true);
            let differ = states_differ(enc, n - 1, n);
            assert_in_group(enc.be_mut(), &mut step_sat, perm, differ, true);
        }
        let bug_group = step_sat.create_group();
        assert_in_group(enc.be_mut(), &mut step_sat, bug_group, not_phi_n, true);
        match step_sat.solve_all_groups() {
            Ok(SolveResult::Unsat) => {
                log::info!("dual: {:?} step proved true at n={}", direction, n);
                return Ok((Status::True, None));
            }
            Err(e) => {
                log::warn!("dual: step SAT back-end failure: {}", e);
                return Ok((Status::Unknown, None));
            }
            Ok(SolveResult::Sat(_)) => {}
        }
        step_sat.destroy_group(bug_group);
    }
    log::warn!("dual: n_max={} exhausted without a verdict", n_max);
    Ok((Status::Unknown, None))
}
