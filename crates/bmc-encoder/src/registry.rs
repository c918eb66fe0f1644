//! The untimed block: variable declaration and the logical index space
//! (spec.md §3, §4.2).
//!
//! Declaration happens once, before the first [`commit_layer`] call backs
//! the untimed block with physical storage. After that the untimed layout
//! is frozen — this mirrors the NuSMV encoder, which fixes the symbol
//! table before unrolling begins.

use std::collections::HashMap;

use bmc_base::Symbol;

use crate::classes::VarKind;

/// A variable's position within its class's untimed section.
pub type LogIdx = u32;

#[derive(Default)]
pub struct Registry {
    curr: Vec<Symbol>,
    frozen: Vec<Symbol>,
    input: Vec<Symbol>,
    by_name: HashMap<Symbol, (VarKind, LogIdx)>,
    committed: bool,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Declares a new `Curr` or `Frozen` or `Input` variable in the
    /// untimed block. `Next` variables are never declared directly — they
    /// mirror `Curr` one-to-one.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if called after [`Registry::commit`], or if `name` is
    /// already registered (possibly under a different class).
    pub fn declare(&mut self, name: Symbol, kind: VarKind) -> LogIdx {
        assert!(
            !self.committed,
            "contract violation: cannot declare variable after the untimed layout is committed"
        );
        assert!(
            kind != VarKind::Next,
            "contract violation: NEXT variables are never declared directly"
        );
        assert!(
            !self.by_name.contains_key(&name),
            "contract violation: variable already registered"
        );
        let bucket = match kind {
            VarKind::Curr => &mut self.curr,
            VarKind::Frozen => &mut self.frozen,
            VarKind::Input => &mut self.input,
            VarKind::Next => unreachable!(),
        };
        let log_idx = bucket.len() as LogIdx;
        bucket.push(name);
        self.by_name.insert(name, (kind, log_idx));
        log_idx
    }

    /// Freezes the untimed layout. Idempotent.
    pub fn commit(&mut self) {
        self.committed = true;
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn name_to_untimed(&self, name: Symbol) -> Option<(VarKind, LogIdx)> {
        self.by_name.get(&name).copied()
    }

    pub fn count(&self, kind: VarKind) -> usize {
        match kind {
            VarKind::Curr | VarKind::Next => self.curr.len(),
            VarKind::Frozen => self.frozen.len(),
            VarKind::Input => self.input.len(),
        }
    }

    pub fn name_at(&self, kind: VarKind, log_idx: LogIdx) -> Symbol {
        let bucket = match kind {
            VarKind::Curr | VarKind::Next => &self.curr,
            VarKind::Frozen => &self.frozen,
            VarKind::Input => &self.input,
        };
        bucket[log_idx as usize]
    }

    pub fn iter(&self, mask: crate::classes::VarMask) -> impl Iterator<Item = (VarKind, LogIdx, Symbol)> + '_ {
        [VarKind::Curr, VarKind::Frozen, VarKind::Input, VarKind::Next]
            .into_iter()
            .filter(move |k| mask.contains(*k))
            .flat_map(move |k| {
                let n = self.count(k);
                (0..n as LogIdx).map(move |i| (k, i, self.name_at(k, i)))
            })
    }
}
