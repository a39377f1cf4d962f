use starpath_common::Coord;

/// The four neighbors of `at`, closest to `destination` first.
///
/// Ties keep the fixed up, right, down, left order. This is a greedy bias
/// toward a quick feasible route, not a shortest-path guarantee.
pub fn ordered_moves(at: Coord, destination: Coord) -> [Coord; 4] {
    let mut moves = at.neighbors();
    moves.sort_by_key(|m| m.manhattan(destination));
    moves
}
