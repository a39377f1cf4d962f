use serde::{Deserialize, Serialize};
use std::fmt;

/// Energy carried by the vessel. Costs, thresholds and multipliers share the type.
pub type Energy = i64;

/// A grid coordinate (row, column). Serialized as `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighboring coordinate one step in `dir`. May lie outside the grid.
    pub fn step(self, dir: Direction) -> Self {
        let (dr, dc) = dir.offset();
        Self::new(self.row + dr, self.col + dc)
    }

    /// The four axis-aligned neighbors in fixed order: up, right, down, left.
    pub fn neighbors(self) -> [Coord; 4] {
        Direction::ALL.map(|dir| self.step(dir))
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True when `other` is one of the four axis-aligned neighbors.
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<[i32; 2]> for Coord {
    fn from([row, col]: [i32; 2]) -> Self {
        Self::new(row, col)
    }
}

impl From<Coord> for [i32; 2] {
    fn from(c: Coord) -> Self {
        [c.row, c.col]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// Axis-aligned movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Fixed scan order used for neighbor generation and giant-star checks.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// (row, col) delta for one step.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Right => (0, 1),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
        }
    }
}

/// Paired teleport: stepping onto `entrance` moves the vessel to `exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wormhole {
    pub entrance: Coord,
    pub exit: Coord,
}

/// Cell that multiplies current energy on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RechargeZone {
    pub at: Coord,
    pub multiplier: Energy,
}

/// Cell that can only be entered with at least `threshold` energy, and costs exactly that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinChargeCell {
    pub at: Coord,
    pub threshold: Energy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_follow_fixed_order() {
        let c = Coord::new(2, 3);
        assert_eq!(
            c.neighbors(),
            [
                Coord::new(1, 3),
                Coord::new(2, 4),
                Coord::new(3, 3),
                Coord::new(2, 2)
            ]
        );
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Coord::new(0, 0).manhattan(Coord::new(2, 2)), 4);
        assert_eq!(Coord::new(-1, 5).manhattan(Coord::new(1, 2)), 5);
        assert_eq!(Coord::new(4, 4).manhattan(Coord::new(4, 4)), 0);
    }

    #[test]
    fn adjacency_excludes_diagonals() {
        let c = Coord::new(1, 1);
        assert!(c.is_adjacent(Coord::new(0, 1)));
        assert!(!c.is_adjacent(Coord::new(0, 0)));
        assert!(!c.is_adjacent(c));
    }

    #[test]
    fn coord_serializes_as_pair() {
        let json = serde_json::to_string(&Coord::new(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
        let back: Coord = serde_json::from_str("[3,7]").unwrap();
        assert_eq!(back, Coord::new(3, 7));
    }

    #[test]
    fn feature_records_deserialize() {
        let w: Wormhole = serde_json::from_str(r#"{"entrance":[1,1],"exit":[4,2]}"#).unwrap();
        assert_eq!(w.exit, Coord::new(4, 2));
        let r: RechargeZone = serde_json::from_str(r#"{"at":[0,2],"multiplier":3}"#).unwrap();
        assert_eq!(r.multiplier, 3);
        let m: MinChargeCell = serde_json::from_str(r#"{"at":[2,2],"threshold":8}"#).unwrap();
        assert_eq!(m.threshold, 8);
    }
}
