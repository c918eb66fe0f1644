//! `DriverConfig`: a plain, programmatically-constructed bundle of the
//! knobs a BMC invocation needs (bound, algorithm choice, incremental
//! flag) — mirrors the teacher's `Verifier` config struct
//! (`logicaffeine_verify::solver`), not a file/env-parsed configuration
//! layer, since option parsing is out of this core's scope.

/// Which of the five invariant-checking algorithms (spec.md §4.7.2) to
/// run, with the parameters each one needs.
#[derive(Debug, Clone, Copy)]
pub enum InvariantAlgorithm {
    Classic,
    EenSorensson { k_max: usize },
    ZigZag { n_max: usize },
    Dual { direction: crate::dual::DualDirection, n_max: usize },
    Falsification { n_max: usize },
}

/// A single invariant-checking run's configuration.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    pub algorithm: InvariantAlgorithm,
}

impl DriverConfig {
    pub fn new(algorithm: InvariantAlgorithm) -> Self {
        DriverConfig { algorithm }
    }
}

/// Runs the algorithm named by `config` against `phi` (an untimed
/// Boolean invariant). Requires `S: IncrementalSatSolver` uniformly so
/// one dispatcher can serve all five algorithms, even though Classic
/// and Een–Sørensson only use the non-incremental half of the trait.
pub fn run_invariant<S: bmc_sat::IncrementalSatSolver + Default>(
    enc: &mut bmc_encoder::Encoder,
    system: &bmc_model::TransitionSystem,
    phi: bmc_be::BeId,
    config: &DriverConfig,
) -> crate::error::DriverResult<(crate::property::Status, Option<crate::trace::Trace>)> {
    match config.algorithm {
        InvariantAlgorithm::Classic => Ok(crate::classic::check_classic::<S>(enc, system, phi)),
        InvariantAlgorithm::EenSorensson { k_max } => {
            Ok(crate::een_sorensson::check_een_sorensson::<S>(enc, system, phi, k_max))
        }
        InvariantAlgorithm::ZigZag { n_max } => Ok(crate::zigzag::check_zigzag::<S>(enc, system, phi, n_max)),
        InvariantAlgorithm::Dual { direction, n_max } => {
            crate::dual::check_dual::<S>(enc, system, phi, direction, n_max)
        }
        InvariantAlgorithm::Falsification { n_max } => {
            Ok(crate::falsification::check_falsification::<S>(enc, system, phi, n_max))
        }
    }
}
