//! Falsification (incremental, base direction only): spec.md §4.7.2.
//!
//! Just the base half of Dual/forward, kept alive across a growing
//! bound `n` in a single incremental solver. It can only refute a
//! property — exhausting `n_max` without a counterexample yields
//! `Unknown`, never `True`, since no inductive argument is attempted.

use bmc_be::BeId;
use bmc_encoder::Encoder;
use bmc_model::{TransitionSystem, Unroller};
use bmc_sat::{IncrementalSatSolver, SolveResult};

use crate::property::Status;
use crate::sat_support::assert_in_group;
use crate::trace::{build_trace, Trace};

pub fn check_falsification<S: IncrementalSatSolver + Default>(
    enc: &mut Encoder,
    system: &TransitionSystem,
    phi: BeId,
    n_max: usize,
) -> (Status, Option<Trace>) {
    let mut sat = S::default();
    let init0 = {
        let mut unroller = Unroller::new(enc, system);
        unroller.init_0()
    };
    {
        let perm = sat.permanent_group();
        assert_in_group(enc.be_mut(), &mut sat, perm, init0, true);
    }

    for n in 0..=n_max {
        log::debug!("falsification: n={}", n);
        let phi_n = enc.untimed_expr_to_timed(phi, n);
        let not_phi_n = enc.be_mut().not(phi_n);

        let bug_group = sat.create_group();
        assert_in_group(enc.be_mut(), &mut sat, bug_group, not_phi_n, true);
        match sat.solve_all_groups() {
            Ok(SolveResult::Sat(model)) => {
                log::info!("falsification: falsified at n={}", n);
                let trace = build_trace(enc, &model, n, None);
                return (Status::False, Some(trace));
            }
            Err(e) => {
                log::warn!("falsification: SAT back-end failure: {}", e);
                return (Status::Unknown, None);
            }
            Ok(SolveResult::Unsat) => {}
        }
        sat.destroy_group(bug_group);

        let mut unroller = Unroller::new(enc, system);
        let trans_n = unroller.trans_at(n);
        let invar_n1 = unroller.invar_at(n + 1);
        drop(unroller);
        let step = enc.be_mut().and(trans_n, invar_n1);
        let perm = sat.permanent_group();
        assert_in_group(enc.be_mut(), &mut sat, perm, step, true);
    }
    log::warn!(
        "falsification: n_max={} exhausted, no counterexample found (cannot prove safety)",
        n_max
    );
    (Status::Unknown, None)
}
