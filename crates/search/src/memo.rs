use starpath_common::{Coord, Energy};
use std::collections::HashMap;

/// Best energy with which each cell has been reached during one search.
#[derive(Debug, Default)]
pub(crate) struct VisitedMemo {
    best: HashMap<Coord, Energy>,
}

impl VisitedMemo {
    /// Record `energy` at `at` and return true if it beats every earlier visit.
    ///
    /// Equal or worse arrivals are refused. The recording branch's path,
    /// destroyed black holes and used wormholes are not part of the key.
    pub(crate) fn admit(&mut self, at: Coord, energy: Energy) -> bool {
        match self.best.get(&at) {
            Some(&best) if best >= energy => false,
            _ => {
                self.best.insert(at, energy);
                true
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.best.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_equal_or_worse_energy() {
        let mut memo = VisitedMemo::default();
        let at = Coord::new(1, 1);
        assert!(memo.admit(at, 5));
        assert!(!memo.admit(at, 5));
        assert!(!memo.admit(at, 3));
        assert!(memo.admit(at, 6));
        assert!(!memo.admit(at, 5));
        assert!(memo.admit(Coord::new(0, 0), 1));
        assert_eq!(memo.len(), 2);
    }
}
