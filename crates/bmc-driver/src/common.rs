//! Small helpers shared by the five invariant algorithms: building the
//! pairwise state-distinctness constraint the Een–Sørensson/ZigZag/Dual
//! uniqueness checks all need, and the "phi holds at every earlier step"
//! conjunction.

use bmc_be::BeId;
use bmc_encoder::{Encoder, VarMask};

/// `true` iff the current-state bits at times `i` and `j` differ on at
/// least one bit — approximating the property's cone-of-influence with
/// the full current-state vector (see `DESIGN.md`).
pub(crate) fn states_differ(enc: &mut Encoder, i: usize, j: usize) -> BeId {
    let state_vars: Vec<_> = enc.iter_vars(VarMask::CURR).collect();
    let mut differ = enc.be().mk_false();
    for (kind, log_idx, _) in state_vars {
        let vi = enc.index_to_timed(kind, log_idx, i);
        let vj = enc.index_to_timed(kind, log_idx, j);
        let bit_differs = enc.be_mut().xor(vi, vj);
        differ = enc.be_mut().or(differ, bit_differs);
    }
    differ
}

/// `AND_{i < k} phi_i`, timed.
pub(crate) fn phi_holds_before(enc: &mut Encoder, phi: BeId, k: usize) -> BeId {
    let mut acc = enc.be().mk_true();
    for i in 0..k {
        let phi_i = enc.untimed_expr_to_timed(phi, i);
        acc = enc.be_mut().and(acc, phi_i);
    }
    acc
}

/// `loop(k,l)`: the state-equality condition a `(k,l)`-loop requires —
/// `AND_i var_i@l ≡ var_i@k` — conjoined into the unrolled path whenever
/// an LTL loop check fixes a concrete loop-back point `l`. The unrolled
/// path has a real `Trans` edge for every `i ∈ [0,k)`, but none from `k`
/// back to `l`; without this conjunct nothing forces the model at `k` to
/// actually coincide with the model at `l`, so a path the tableau treats
/// as periodic might not be (see `Bmc_Tableau_GetLoopCondition`).
pub(crate) fn loop_condition(enc: &mut Encoder, l: usize, k: usize) -> BeId {
    let differ = states_differ(enc, l, k);
    enc.be_mut().not(differ)
}
