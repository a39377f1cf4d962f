use starpath_common::Coord;
use std::collections::HashSet;

/// State visible to one search branch and its descendants.
///
/// Every mutation has an exact inverse, applied in reverse order on
/// backtrack, so sibling branches never observe each other's tentative moves.
#[derive(Debug, Default)]
pub(crate) struct BranchState {
    path: Vec<Coord>,
    on_path: HashSet<Coord>,
    destroyed: HashSet<Coord>,
    used_wormholes: HashSet<Coord>,
}

impl BranchState {
    pub(crate) fn enter(&mut self, at: Coord) {
        self.path.push(at);
        self.on_path.insert(at);
    }

    pub(crate) fn leave(&mut self, at: Coord) {
        let popped = self.path.pop();
        debug_assert_eq!(popped, Some(at), "branch path unwound out of order");
        self.on_path.remove(&at);
    }

    pub(crate) fn on_path(&self, at: Coord) -> bool {
        self.on_path.contains(&at)
    }

    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }

    /// The current path extended with `last`.
    pub(crate) fn path_to(&self, last: Coord) -> Vec<Coord> {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(last);
        path
    }

    pub(crate) fn destroy(&mut self, black_hole: Coord) {
        self.destroyed.insert(black_hole);
    }

    pub(crate) fn restore(&mut self, black_hole: Coord) {
        self.destroyed.remove(&black_hole);
    }

    pub(crate) fn is_destroyed(&self, black_hole: Coord) -> bool {
        self.destroyed.contains(&black_hole)
    }

    pub(crate) fn use_wormhole(&mut self, entrance: Coord) {
        self.used_wormholes.insert(entrance);
    }

    pub(crate) fn release_wormhole(&mut self, entrance: Coord) {
        self.used_wormholes.remove(&entrance);
    }

    pub(crate) fn wormhole_used(&self, entrance: Coord) -> bool {
        self.used_wormholes.contains(&entrance)
    }

    /// True when nothing is entered, destroyed or used.
    pub(crate) fn is_unwound(&self) -> bool {
        self.path.is_empty()
            && self.on_path.is_empty()
            && self.destroyed.is_empty()
            && self.used_wormholes.is_empty()
    }
}
