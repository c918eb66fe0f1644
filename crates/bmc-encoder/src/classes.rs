//! The four variable classes that make up the untimed block layout
//! `[S_curr | F | I | S_next]` (spec.md §3).

/// Which of the four untimed sections a variable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// Current-state variable (`S_curr`).
    Curr,
    /// Frozen variable (`F`): a single physical slot shared by every timed
    /// block, used for parameters that never change across the path.
    Frozen,
    /// Input variable (`I`).
    Input,
    /// Next-state variable (`S_next`), the untimed mirror of `Curr`.
    /// `NEXT` is never independently registered — it exists implicitly,
    /// one per `Curr` variable — but is a first-class class for iteration
    /// and shifting purposes.
    Next,
}

/// A bitmask selecting a subset of [`VarKind`]s, used by iteration and
/// shift-table construction (spec.md §4.2: "iteration with type masks").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarMask(u8);

impl VarMask {
    pub const CURR: VarMask = VarMask(1 << 0);
    pub const FROZEN: VarMask = VarMask(1 << 1);
    pub const INPUT: VarMask = VarMask(1 << 2);
    pub const NEXT: VarMask = VarMask(1 << 3);
    pub const ALL: VarMask = VarMask(0b1111);

    pub const fn empty() -> VarMask {
        VarMask(0)
    }

    pub const fn union(self, other: VarMask) -> VarMask {
        VarMask(self.0 | other.0)
    }

    pub fn contains(self, kind: VarKind) -> bool {
        self.0 & VarMask::of(kind).0 != 0
    }

    fn of(kind: VarKind) -> VarMask {
        match kind {
            VarKind::Curr => VarMask::CURR,
            VarKind::Frozen => VarMask::FROZEN,
            VarKind::Input => VarMask::INPUT,
            VarKind::Next => VarMask::NEXT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_mask_contains_every_kind() {
        assert!(VarMask::ALL.contains(VarKind::Curr));
        assert!(VarMask::ALL.contains(VarKind::Frozen));
        assert!(VarMask::ALL.contains(VarKind::Input));
        assert!(VarMask::ALL.contains(VarKind::Next));
    }

    #[test]
    fn single_mask_excludes_other_kinds() {
        assert!(VarMask::CURR.contains(VarKind::Curr));
        assert!(!VarMask::CURR.contains(VarKind::Input));
    }

    #[test]
    fn union_combines_masks() {
        let m = VarMask::CURR.union(VarMask::INPUT);
        assert!(m.contains(VarKind::Curr));
        assert!(m.contains(VarKind::Input));
        assert!(!m.contains(VarKind::Frozen));
    }
}
