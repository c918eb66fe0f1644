//! The transition system itself: `Init`, `Trans`, `Invar`, and fairness
//! constraints, all as untimed expressions built through an [`Encoder`]
//! (spec.md §3).

use bmc_be::BeId;
use bmc_encoder::Encoder;

/// A finite-state transition system ready for unrolling.
///
/// Every field is an *untimed* expression: `init`/`invar`/the fairness
/// constraints reference only `Curr`/`Frozen`/`Input` variables, and
/// `trans` additionally references `Next`. [`crate::Unroller`] places
/// these at concrete time steps.
pub struct TransitionSystem {
    pub init: BeId,
    pub trans: BeId,
    pub invar: BeId,
    pub fairness: Vec<BeId>,
}

impl TransitionSystem {
    pub fn new(init: BeId, trans: BeId, invar: BeId, fairness: Vec<BeId>) -> Self {
        TransitionSystem {
            init,
            trans,
            invar,
            fairness,
        }
    }

    /// A transition system with no fairness constraints and a trivial
    /// (always-true) invariant — the common case for plain invariant
    /// checking.
    pub fn without_fairness(enc: &mut Encoder, init: BeId, trans: BeId) -> Self {
        let invar = enc.be().mk_true();
        TransitionSystem::new(init, trans, invar, Vec::new())
    }
}
