//! SAT back-end abstraction for the bounded model checker: the
//! [`SatSolver`]/[`IncrementalSatSolver`] traits, a dependency-free
//! reference backend ([`DpllSolver`]), and an optional `varisat`-backed
//! production backend ([`VarisatSolver`], behind the `varisat-backend`
//! feature).

mod dpll;
mod traits;

#[cfg(feature = "varisat-backend")]
mod varisat_backend;

pub use dpll::DpllSolver;
pub use traits::{GroupId, IncrementalSatSolver, Lit, SatSolver, SolveResult};

#[cfg(feature = "varisat-backend")]
pub use varisat_backend::VarisatSolver;
