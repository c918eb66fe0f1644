//! Tableau construction: turns an LTL/PLTL formula into a Boolean
//! expression over a bounded `(k,l)`-path, either directly (`ltl`/`pltl`)
//! or through the linear-size auxiliary-variable encoding (`sbmc`)
//! (spec.md §4.4–§4.6).

mod formula;
mod ltl;
mod pltl;
mod sbmc;

pub use formula::{FormulaArena, FormulaId, FormulaNode};
pub use ltl::Tableau;
pub use sbmc::SbmcBuilder;
