//! Timed blocks: physical storage for state/input variables at each
//! unrolling depth, plus the frozen-variable aliasing and free-list reuse
//! described in spec.md §3/§4.2 and (for FIFO reuse) the NuSMV encoder's
//! `BeEnc_shift_var` free-list design.
//!
//! A frozen variable gets exactly one physical slot, shared by every
//! timed block (`F` never needs shifting). `Curr`/`Input` variables get a
//! fresh physical slot per time step — except that when a layer is
//! removed (bound shrinks, e.g. a `Dual` backward step unwinds), its
//! slots go on a free list and are handed back out, FIFO, the next time a
//! layer is appended. This keeps the physical index space compact across
//! repeated grow/shrink cycles instead of growing monotonically.

use std::collections::VecDeque;

use bmc_be::{BeManager, PhysIdx};

#[derive(Default)]
pub struct TimedBlocks {
    frozen_phys: Vec<PhysIdx>,
    state_phys: Vec<Vec<PhysIdx>>,
    input_phys: Vec<Vec<PhysIdx>>,
    free_list: VecDeque<PhysIdx>,
    next_phys: PhysIdx,
}

impl TimedBlocks {
    pub fn new() -> Self {
        TimedBlocks::default()
    }

    /// Sets the first physical index available for timed allocation,
    /// reserving everything below it (the untimed identity block) for the
    /// encoder's symbolic formulas. Must be called before any layer is
    /// allocated.
    pub fn bootstrap(&mut self, start: PhysIdx) {
        assert_eq!(
            self.next_phys, 0,
            "contract violation: bootstrap called after allocation started"
        );
        self.next_phys = start;
    }

    fn alloc_slot(&mut self) -> PhysIdx {
        if let Some(reused) = self.free_list.pop_front() {
            return reused;
        }
        let p = self.next_phys;
        self.next_phys += 1;
        p
    }

    /// Allocates the (one-time) frozen block. Panics if called twice.
    pub fn alloc_frozen(&mut self, be: &mut BeManager, n: usize) {
        assert!(
            self.frozen_phys.is_empty() || n == 0,
            "contract violation: frozen block already allocated"
        );
        for _ in 0..n {
            let p = self.alloc_slot();
            self.frozen_phys.push(p);
        }
        be.reserve(self.next_phys);
    }

    /// Ensures a state layer exists at time `t` with `n` slots, allocating
    /// it (from the free list first) if this is a new depth.
    pub fn ensure_state_layer(&mut self, be: &mut BeManager, t: usize, n: usize) {
        while self.state_phys.len() <= t {
            let slots: Vec<PhysIdx> = (0..n).map(|_| self.alloc_slot()).collect();
            self.state_phys.push(slots);
        }
        be.reserve(self.next_phys);
    }

    /// Allocates one fresh physical slot outside the state/input/frozen
    /// layout — for tableau-internal bookkeeping variables (e.g. SBMC's
    /// `el` variables) that need their own identity but are not part of
    /// the model's state space. Draws from the same free list as every
    /// other slot, so a removed layer's indices can still be recycled
    /// into one of these.
    pub fn alloc_aux(&mut self, be: &mut BeManager) -> PhysIdx {
        let p = self.alloc_slot();
        be.reserve(self.next_phys);
        p
    }

    /// Ensures an input layer exists at time `t` with `n` slots.
    pub fn ensure_input_layer(&mut self, be: &mut BeManager, t: usize, n: usize) {
        while self.input_phys.len() <= t {
            let slots: Vec<PhysIdx> = (0..n).map(|_| self.alloc_slot()).collect();
            self.input_phys.push(slots);
        }
        be.reserve(self.next_phys);
    }

    /// Removes the deepest state layer, returning its slots to the free
    /// list for the next `ensure_state_layer` call to reuse.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if there is no layer to remove.
    pub fn remove_last_state_layer(&mut self) {
        let layer = self
            .state_phys
            .pop()
            .expect("contract violation: no state layer to remove");
        self.free_list.extend(layer);
    }

    /// Removes the deepest input layer, returning its slots to the free
    /// list.
    pub fn remove_last_input_layer(&mut self) {
        let layer = self
            .input_phys
            .pop()
            .expect("contract violation: no input layer to remove");
        self.free_list.extend(layer);
    }

    pub fn frozen_phys(&self, log_idx: u32) -> PhysIdx {
        self.frozen_phys[log_idx as usize]
    }

    pub fn state_phys(&self, t: usize, log_idx: u32) -> PhysIdx {
        self.state_phys[t][log_idx as usize]
    }

    pub fn input_phys(&self, t: usize, log_idx: u32) -> PhysIdx {
        self.input_phys[t][log_idx as usize]
    }

    /// The deepest time step for which a state layer exists (`k`, in
    /// spec.md's notation), or `None` if nothing has been unrolled yet.
    pub fn max_state_time(&self) -> Option<usize> {
        self.state_phys.len().checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_layers_get_distinct_physical_slots() {
        let mut be = BeManager::new();
        let mut t = TimedBlocks::new();
        t.ensure_state_layer(&mut be, 0, 2);
        t.ensure_state_layer(&mut be, 1, 2);
        assert_ne!(t.state_phys(0, 0), t.state_phys(1, 0));
    }

    #[test]
    fn removed_layer_slots_are_reused_fifo() {
        let mut be = BeManager::new();
        let mut t = TimedBlocks::new();
        t.ensure_state_layer(&mut be, 0, 2);
        let freed = t.state_phys(0, 0);
        t.remove_last_state_layer();
        t.ensure_state_layer(&mut be, 0, 2);
        assert_eq!(t.state_phys(0, 0), freed);
    }

    #[test]
    fn frozen_slot_is_stable_and_single() {
        let mut be = BeManager::new();
        let mut t = TimedBlocks::new();
        t.alloc_frozen(&mut be, 1);
        let p = t.frozen_phys(0);
        t.ensure_state_layer(&mut be, 0, 3);
        assert_eq!(t.frozen_phys(0), p);
    }

    #[test]
    fn max_state_time_tracks_deepest_layer() {
        let mut be = BeManager::new();
        let mut t = TimedBlocks::new();
        assert_eq!(t.max_state_time(), None);
        t.ensure_state_layer(&mut be, 0, 1);
        t.ensure_state_layer(&mut be, 1, 1);
        assert_eq!(t.max_state_time(), Some(1));
    }

    #[test]
    #[should_panic(expected = "no state layer to remove")]
    fn remove_on_empty_panics() {
        let mut t = TimedBlocks::new();
        t.remove_last_state_layer();
    }

    #[test]
    fn aux_slots_never_collide_with_state_slots() {
        let mut be = BeManager::new();
        let mut t = TimedBlocks::new();
        let aux = t.alloc_aux(&mut be);
        t.ensure_state_layer(&mut be, 0, 2);
        assert_ne!(aux, t.state_phys(0, 0));
        assert_ne!(aux, t.state_phys(0, 1));
    }
}
