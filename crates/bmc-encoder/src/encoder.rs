//! The BE encoder: ties the untimed-block [`Registry`] and the per-depth
//! [`TimedBlocks`] together, and provides the navigation API the model
//! unroller and tableau builders use to go from symbolic (untimed) state
//! to a concrete physical `BeId` at a given time (spec.md §3, §4.1, §4.2).
//!
//! The untimed block is given a fixed physical "identity" reservation —
//! logical index `i` is physical index `i` in this reservation — so that
//! `Init`/`Trans`/`Invar` formulas can be built once, symbolically, before
//! any unrolling happens, and then placed at a concrete time step with
//! [`Encoder::untimed_expr_to_timed`]/[`Encoder::untimed_expr_to_times`].
//! Timed physical storage is allocated starting right after that
//! reservation.

use std::collections::HashMap;

use bmc_base::Symbol;
use bmc_be::{BeId, BeManager, LogIdx as ShiftLogIdx, PhysIdx};

use crate::classes::{VarKind, VarMask};
use crate::registry::{LogIdx, Registry};
use crate::timed::TimedBlocks;

pub struct Encoder {
    be: BeManager,
    registry: Registry,
    timed: TimedBlocks,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Encoder {
            be: BeManager::new(),
            registry: Registry::new(),
            timed: TimedBlocks::new(),
        }
    }

    pub fn be(&self) -> &BeManager {
        &self.be
    }

    pub fn be_mut(&mut self) -> &mut BeManager {
        &mut self.be
    }

    /// Declares a variable in the untimed block.
    ///
    /// # Panics (contract violation)
    ///
    /// See [`Registry::declare`].
    pub fn declare(&mut self, name: Symbol, kind: VarKind) -> LogIdx {
        self.registry.declare(name, kind)
    }

    pub fn name_to_untimed(&self, name: Symbol) -> Option<(VarKind, LogIdx)> {
        self.registry.name_to_untimed(name)
    }

    pub fn iter_vars(&self, mask: VarMask) -> impl Iterator<Item = (VarKind, LogIdx, Symbol)> + '_ {
        self.registry.iter(mask)
    }

    fn logical_base(&self, kind: VarKind) -> u32 {
        let n_s = self.registry.count(VarKind::Curr) as u32;
        let n_f = self.registry.count(VarKind::Frozen) as u32;
        let n_i = self.registry.count(VarKind::Input) as u32;
        match kind {
            VarKind::Curr => 0,
            VarKind::Frozen => n_s,
            VarKind::Input => n_s + n_f,
            VarKind::Next => n_s + n_f + n_i,
        }
    }

    fn total_logical(&self) -> u32 {
        let n_s = self.registry.count(VarKind::Curr) as u32;
        let n_f = self.registry.count(VarKind::Frozen) as u32;
        let n_i = self.registry.count(VarKind::Input) as u32;
        2 * n_s + n_f + n_i
    }

    fn log_index(&self, kind: VarKind, log_idx: LogIdx) -> ShiftLogIdx {
        self.logical_base(kind) + log_idx
    }

    /// Freezes the untimed layout and allocates its fixed physical
    /// "identity" reservation plus the one-time frozen-variable block.
    /// Idempotent.
    pub fn commit_layer(&mut self) {
        if self.registry.is_committed() {
            return;
        }
        self.registry.commit();
        let total = self.total_logical();
        self.be.reserve(total);
        self.timed.bootstrap(total);
        let n_f = self.registry.count(VarKind::Frozen);
        self.timed.alloc_frozen(&mut self.be, n_f);
    }

    /// Builds an expression variable directly in untimed (symbolic)
    /// space, for use in `Init`/`Trans`/`Invar` before unrolling.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if the layout has not been committed yet.
    pub fn untimed_var(&mut self, kind: VarKind, log_idx: LogIdx) -> BeId {
        assert!(
            self.registry.is_committed(),
            "contract violation: untimed_var called before commit_layer"
        );
        let phys = self.log_index(kind, log_idx);
        self.be.mk_var(phys)
    }

    /// Resolves the physical variable for `(kind, log_idx)` at time `t`,
    /// allocating the timed layer it needs on demand.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if the layout has not been committed yet.
    pub fn index_to_timed(&mut self, kind: VarKind, log_idx: LogIdx, t: usize) -> BeId {
        assert!(
            self.registry.is_committed(),
            "contract violation: index_to_timed called before commit_layer"
        );
        match kind {
            VarKind::Curr => {
                let n_s = self.registry.count(VarKind::Curr);
                self.timed.ensure_state_layer(&mut self.be, t, n_s);
                self.be.mk_var(self.timed.state_phys(t, log_idx))
            }
            VarKind::Next => {
                let n_s = self.registry.count(VarKind::Curr);
                self.timed.ensure_state_layer(&mut self.be, t + 1, n_s);
                self.be.mk_var(self.timed.state_phys(t + 1, log_idx))
            }
            VarKind::Frozen => self.be.mk_var(self.timed.frozen_phys(log_idx)),
            VarKind::Input => {
                let n_i = self.registry.count(VarKind::Input);
                self.timed.ensure_input_layer(&mut self.be, t, n_i);
                self.be.mk_var(self.timed.input_phys(t, log_idx))
            }
        }
    }

    /// Allocates a fresh auxiliary BE variable outside the untimed
    /// state/frozen/input layout, for a caller (e.g. `bmc-tableau`'s
    /// SBMC builder) that needs its own physical identity per call but
    /// is not declaring a piece of the model's state space.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if the layout has not been committed yet.
    pub fn alloc_aux_var(&mut self) -> BeId {
        assert!(
            self.registry.is_committed(),
            "contract violation: alloc_aux_var called before commit_layer"
        );
        let phys = self.timed.alloc_aux(&mut self.be);
        self.be.mk_var(phys)
    }

    pub fn var_curr_to_next(&mut self, log_idx: LogIdx, t: usize) -> BeId {
        self.index_to_timed(VarKind::Next, log_idx, t)
    }

    pub fn var_next_to_curr(&mut self, log_idx: LogIdx, t: usize) -> BeId {
        assert!(t > 0, "contract violation: no curr predecessor at time 0");
        self.index_to_timed(VarKind::Curr, log_idx, t - 1)
    }

    /// Places an untimed expression (referencing `Curr`/`Frozen`/`Input`
    /// only — e.g. `Init` or `Invar`) at time `t`.
    pub fn untimed_expr_to_timed(&mut self, e: BeId, t: usize) -> BeId {
        let (log2phy, phy2log) = self.identity_to_time_tables(t, t);
        self.be.logical_shift_var(e, 0, &log2phy, &phy2log)
    }

    /// Places an untimed expression that also references `Next` (e.g.
    /// `Trans`) across the transition from `t_curr` to `t_next`.
    pub fn untimed_expr_to_times(&mut self, e: BeId, t_curr: usize, t_next: usize) -> BeId {
        let (log2phy, phy2log) = self.identity_to_time_tables(t_curr, t_next);
        self.be.logical_shift_var(e, 0, &log2phy, &phy2log)
    }

    /// Shifts an already-timed expression (containing only `Curr@t` and
    /// `Frozen` physical variables) forward to `Curr@(t+1)`.
    pub fn shift_curr_to_next(&mut self, e: BeId, t: usize) -> BeId {
        let n_s = self.registry.count(VarKind::Curr);
        let n_f = self.registry.count(VarKind::Frozen);
        self.timed.ensure_state_layer(&mut self.be, t, n_s);
        self.timed.ensure_state_layer(&mut self.be, t + 1, n_s);

        let mut phy2log = HashMap::new();
        for i in 0..n_s as u32 {
            phy2log.insert(self.timed.state_phys(t, i), i);
        }
        for i in 0..n_f as u32 {
            phy2log.insert(self.timed.frozen_phys(i), n_s as u32 + i);
        }
        let total = n_s as u32 + n_f as u32;
        let mut log2phy = vec![0u32; total as usize];
        for i in 0..n_s as u32 {
            log2phy[i as usize] = self.timed.state_phys(t + 1, i);
        }
        for i in 0..n_f as u32 {
            log2phy[(n_s as u32 + i) as usize] = self.timed.frozen_phys(i);
        }
        self.be.logical_shift_var(e, 0, &log2phy, &phy2log)
    }

    /// Drops the deepest state and input layers, returning their physical
    /// slots to the free list. Used when a bound shrinks (e.g. Dual's
    /// backward step unwinds one step).
    pub fn remove_layer(&mut self) {
        self.timed.remove_last_state_layer();
        if !self.timed_input_is_empty() {
            self.timed.remove_last_input_layer();
        }
    }

    fn timed_input_is_empty(&self) -> bool {
        self.registry.count(VarKind::Input) == 0
    }

    pub fn max_unrolled_depth(&self) -> Option<usize> {
        self.timed.max_state_time()
    }

    /// Builds `(log2phy, phy2log)` mapping untimed identity space to the
    /// physical slots at `t_curr` (for `Curr`/`Frozen`/`Input`) and
    /// `t_next` (for `Next`), ensuring the layers involved exist.
    fn identity_to_time_tables(
        &mut self,
        t_curr: usize,
        t_next: usize,
    ) -> (Vec<PhysIdx>, HashMap<PhysIdx, ShiftLogIdx>) {
        let total = self.total_logical();
        let mut log2phy = vec![0u32; total as usize];
        let mut phy2log = HashMap::new();

        for kind in [VarKind::Curr, VarKind::Frozen, VarKind::Input, VarKind::Next] {
            let n = self.registry.count(kind);
            for i in 0..n as u32 {
                let log = self.log_index(kind, i);
                let target_time = if kind == VarKind::Next { t_next } else { t_curr };
                let var = self.index_to_timed(kind, i, target_time);
                let phys = self
                    .be
                    .var_index(var)
                    .expect("index_to_timed always returns a plain variable");
                log2phy[log as usize] = phys;
                // The untimed identity physical index equals `log` by
                // construction (see `commit_layer`).
                phy2log.insert(log, log);
            }
        }
        (log2phy, phy2log)
    }
}
