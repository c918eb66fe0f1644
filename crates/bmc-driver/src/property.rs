//! Properties and their verdicts (spec.md §6.1).
//!
//! A property is either an `INVARSPEC` (a single untimed Boolean
//! expression that must hold in every reachable state) or an `LTLSPEC`
//! (a formula built in a [`bmc_tableau::FormulaArena`]). Once an
//! algorithm has produced a non-`Unknown` verdict, re-checking the same
//! property is a user error (a warning, not a crash — spec.md §7).

use bmc_be::BeId;
use bmc_tableau::FormulaId;

use crate::error::{DriverError, DriverResult};

/// What a property's formula is built out of.
#[derive(Debug, Clone, Copy)]
pub enum PropertyKind {
    /// `INVARSPEC`: an untimed Boolean expression.
    Invariant(BeId),
    /// `LTLSPEC`: a formula in the shared tableau arena.
    Ltl(FormulaId),
}

/// The outcome of checking a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Unknown,
    True,
    False,
}

/// A single property and its current verdict.
#[derive(Debug, Clone, Copy)]
pub struct Property {
    pub kind: PropertyKind,
    pub status: Status,
}

impl Property {
    pub fn invariant(e: BeId) -> Self {
        Property {
            kind: PropertyKind::Invariant(e),
            status: Status::Unknown,
        }
    }

    pub fn ltl(f: FormulaId) -> Self {
        Property {
            kind: PropertyKind::Ltl(f),
            status: Status::Unknown,
        }
    }
}

/// A flat list of properties, indexed the way `bmc_base::CoreError`'s
/// `PropertyIndexOutOfRange`/`PropertyAlreadyChecked` expect.
#[derive(Default)]
pub struct PropertySet {
    properties: Vec<Property>,
}

impl PropertySet {
    pub fn new() -> Self {
        PropertySet::default()
    }

    pub fn add(&mut self, p: Property) -> usize {
        self.properties.push(p);
        self.properties.len() - 1
    }

    pub fn get(&self, idx: usize) -> DriverResult<&Property> {
        self.properties
            .get(idx)
            .ok_or_else(|| DriverError::from(bmc_base::CoreError::PropertyIndexOutOfRange(idx)))
    }

    /// Marks `idx`'s verdict, first checking it has not already been
    /// decided (spec.md §7: re-checking is a user error, not a crash).
    pub fn begin_check(&mut self, idx: usize) -> DriverResult<PropertyKind> {
        let p = self
            .properties
            .get(idx)
            .ok_or_else(|| DriverError::from(bmc_base::CoreError::PropertyIndexOutOfRange(idx)))?;
        if p.status != Status::Unknown {
            return Err(DriverError::from(bmc_base::CoreError::PropertyAlreadyChecked));
        }
        Ok(p.kind)
    }

    pub fn set_status(&mut self, idx: usize, status: Status) {
        self.properties[idx].status = status;
    }
}
