//! Counterexample / witness traces (spec.md §6.2).
//!
//! A trace is read directly off a SAT model: `bmc-be`'s CNF encoding maps
//! physical variable `p` to DIMACS variable `p+1` (see `bmc-be::cnf`), so
//! the model vector returned by [`bmc_sat::SolveResult::Sat`] is already
//! indexed by physical index. This module only has to walk the
//! registered variables at each time step and look the bit up.

use std::collections::HashMap;

use bmc_base::Symbol;
use bmc_encoder::{Encoder, VarKind, VarMask};

/// What kind of step a [`TraceStep`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Step 0, constrained by `Init`.
    Initial,
    /// An interior step, reached by `Trans` from its predecessor.
    Transition,
    /// A combinatorial step carrying both state and input assignments
    /// but no incoming transition (used for the loop-back target).
    InputAndState,
}

/// One time step of a trace: the assignment to every registered
/// variable class at that time.
#[derive(Debug, Clone, Default)]
pub struct TraceStep {
    pub kind: Option<StepKind>,
    pub state: HashMap<Symbol, bool>,
    pub input: HashMap<Symbol, bool>,
    pub frozen: HashMap<Symbol, bool>,
}

/// A full counterexample or witness: `k+1` steps plus an optional
/// loopback marker.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
    /// `Some(l)` iff the path loops back from step `k` to step `l`.
    pub loopback: Option<usize>,
}

fn read_bit(model: &[bool], phys: u32) -> bool {
    model.get(phys as usize).copied().unwrap_or(false)
}

/// Reconstructs a [`Trace`] of length `k+1` from a SAT model, per
/// spec.md §6.2/Testable Property 7 (counterexample faithfulness: every
/// bit is read straight from the model, no re-derivation).
pub fn build_trace(enc: &mut Encoder, model: &[bool], k: usize, loopback: Option<usize>) -> Trace {
    let mut steps = Vec::with_capacity(k + 1);
    for t in 0..=k {
        let mut step = TraceStep {
            kind: Some(if t == 0 { StepKind::Initial } else { StepKind::Transition }),
            ..TraceStep::default()
        };
        for (kind, log_idx, name) in enc.iter_vars(VarMask::CURR).collect::<Vec<_>>() {
            let v = enc.index_to_timed(kind, log_idx, t);
            let phys = enc
                .be()
                .var_index(v)
                .expect("index_to_timed always returns a plain variable");
            step.state.insert(name, read_bit(model, phys));
        }
        for (kind, log_idx, name) in enc.iter_vars(VarMask::FROZEN).collect::<Vec<_>>() {
            let v = enc.index_to_timed(kind, log_idx, t);
            let phys = enc
                .be()
                .var_index(v)
                .expect("index_to_timed always returns a plain variable");
            step.frozen.insert(name, read_bit(model, phys));
        }
        for (kind, log_idx, name) in enc.iter_vars(VarMask::INPUT).collect::<Vec<_>>() {
            let v = enc.index_to_timed(kind, log_idx, t);
            let phys = enc
                .be()
                .var_index(v)
                .expect("index_to_timed always returns a plain variable");
            step.input.insert(name, read_bit(model, phys));
        }
        steps.push(step);
    }
    Trace { steps, loopback }
}
