//! The `(k,l)`-path loop selector (spec.md §6.1): a bounded path either
//! has no back-loop, loops back to a specific state `l`, or (for model
//! checking purposes) is considered under every possible loop position.

use crate::error::{CoreError, CoreResult};

/// Which loop a bounded path of length `k` is considered to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSelector {
    /// The path has no loop: it is a genuine finite prefix.
    NoLoop,
    /// The path loops back from state `k` to state `l` (`l < k`).
    At(usize),
    /// Consider every valid loop position `l ∈ [0, k-1]` (and the no-loop
    /// case), used when enumerating `(k,l)`-paths exhaustively.
    All,
}

impl LoopSelector {
    /// Parses a user-supplied loop descriptor: `"X"` (no loop), `"*"`
    /// (all loops), or a non-negative integer `l < k`.
    pub fn parse(s: &str, k: usize) -> CoreResult<LoopSelector> {
        match s {
            "X" => Ok(LoopSelector::NoLoop),
            "*" => Ok(LoopSelector::All),
            _ => {
                let l: i64 = s
                    .parse()
                    .map_err(|_| CoreError::InvalidLoopString(s.to_string()))?;
                if l < 0 || l as usize >= k.max(1) {
                    return Err(CoreError::LoopOutOfRange { l, k });
                }
                Ok(LoopSelector::At(l as usize))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_no_loop() {
        assert_eq!(LoopSelector::parse("X", 5).unwrap(), LoopSelector::NoLoop);
    }

    #[test]
    fn parses_all_loops() {
        assert_eq!(LoopSelector::parse("*", 5).unwrap(), LoopSelector::All);
    }

    #[test]
    fn parses_concrete_loop() {
        assert_eq!(LoopSelector::parse("2", 5).unwrap(), LoopSelector::At(2));
    }

    #[test]
    fn rejects_garbage() {
        assert!(LoopSelector::parse("banana", 5).is_err());
    }

    #[test]
    fn rejects_loop_at_or_past_bound() {
        assert!(matches!(
            LoopSelector::parse("5", 5),
            Err(CoreError::LoopOutOfRange { l: 5, k: 5 })
        ));
    }

    #[test]
    fn rejects_negative_loop() {
        assert!(LoopSelector::parse("-1", 5).is_err());
    }
}
