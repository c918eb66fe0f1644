//! Time shifting: rebuilding a BE with its variables' physical indices
//! remapped through the encoder's logical index space (spec.md §4.1/§4.2).
//!
//! The BE manager itself knows nothing about "current/frozen/input/next"
//! or "time" — it only sees physical indices. The encoder computes, for
//! each *logical* index, either a uniform shift (`logical_shift_var`) or an
//! arbitrary per-index retargeting (`logical_subst`), and hands the BE
//! manager the `log2phy`/`phy2log` tables needed to translate between the
//! two index spaces. Any variable actually occurring in `e` whose logical
//! index maps to [`None`] (the `INVALID_SUBST`/`INVALID_TIME` sentinel) is
//! a contract violation: the caller asked to shift a class of variable the
//! expression isn't allowed to contain (e.g. shifting an expression with
//! input variables through `shift_curr_to_next`, which is only defined on
//! current-state variables).

use std::collections::HashMap;

use crate::node::{BeId, BeManager, Node, PhysIdx};

/// An encoder-level logical index. Opaque to the BE manager beyond being
/// used as a key into `log2phy`/`phy2log`.
pub type LogIdx = u32;

impl BeManager {
    /// Shifts every variable in `e` by a uniform logical delta.
    ///
    /// # Panics (contract violation)
    ///
    /// Panics if a variable in `e` has no entry in `phy2log`, or if its
    /// shifted logical index falls outside `log2phy`.
    pub fn logical_shift_var(
        &mut self,
        e: BeId,
        delta: i64,
        log2phy: &[PhysIdx],
        phy2log: &HashMap<PhysIdx, LogIdx>,
    ) -> BeId {
        self.remap(e, log2phy, phy2log, |log| {
            let shifted = log as i64 + delta;
            if shifted < 0 {
                None
            } else {
                Some(shifted as LogIdx)
            }
        })
    }

    /// Remaps every variable in `e` through an explicit per-index
    /// substitution table. `subst[j] == None` means logical index `j` is
    /// `INVALID_SUBST` — fatal if `e` actually contains that variable.
    pub fn logical_subst(
        &mut self,
        e: BeId,
        subst: &[Option<LogIdx>],
        log2phy: &[PhysIdx],
        phy2log: &HashMap<PhysIdx, LogIdx>,
    ) -> BeId {
        self.remap(e, log2phy, phy2log, |log| {
            subst
                .get(log as usize)
                .copied()
                .unwrap_or(None)
        })
    }

    fn remap(
        &mut self,
        e: BeId,
        log2phy: &[PhysIdx],
        phy2log: &HashMap<PhysIdx, LogIdx>,
        mut target_log: impl FnMut(LogIdx) -> Option<LogIdx>,
    ) -> BeId {
        let mut memo: HashMap<u32, BeId> = HashMap::new();
        let positive = self.remap_node(e.idx(), log2phy, phy2log, &mut target_log, &mut memo);
        if e.neg() {
            self.not(positive)
        } else {
            positive
        }
    }

    fn remap_node(
        &mut self,
        node_idx: u32,
        log2phy: &[PhysIdx],
        phy2log: &HashMap<PhysIdx, LogIdx>,
        target_log: &mut impl FnMut(LogIdx) -> Option<LogIdx>,
        memo: &mut HashMap<u32, BeId>,
    ) -> BeId {
        if let Some(&cached) = memo.get(&node_idx) {
            return cached;
        }
        let result = match *self.node_at(node_idx) {
            Node::Const => self.mk_true(),
            Node::Var(phys) => {
                let log = *phy2log.get(&phys).unwrap_or_else(|| {
                    panic!(
                        "contract violation: physical variable {} has no logical index",
                        phys
                    )
                });
                let target = target_log(log).unwrap_or_else(|| {
                    panic!(
                        "contract violation: variable at logical index {} is INVALID_SUBST/INVALID_TIME for this shift",
                        log
                    )
                });
                let new_phys = *log2phy.get(target as usize).unwrap_or_else(|| {
                    panic!(
                        "contract violation: shifted logical index {} is out of range (log2phy has {} entries)",
                        target,
                        log2phy.len()
                    )
                });
                self.mk_var(new_phys)
            }
            Node::And(l, r) => {
                let nl = self.remap_node(l.idx(), log2phy, phy2log, target_log, memo);
                let nl = if l.neg() { self.not(nl) } else { nl };
                let nr = self.remap_node(r.idx(), log2phy, phy2log, target_log, memo);
                let nr = if r.neg() { self.not(nr) } else { nr };
                self.and(nl, nr)
            }
        };
        memo.insert(node_idx, result);
        result
    }
}
