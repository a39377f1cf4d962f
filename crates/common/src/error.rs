use crate::types::{Coord, Energy};

/// Why a move or a search did not go through.
///
/// None of these are faults: the search treats them as pruned branches and
/// committed execution reports them back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoyageError {
    #[error("coordinate {0} is outside the grid")]
    InvalidCoordinate(Coord),
    #[error("cell {0} is blocked")]
    Blocked(Coord),
    #[error("entering {at} needs {required} energy, {available} available")]
    InsufficientEnergy {
        at: Coord,
        required: Energy,
        available: Energy,
    },
    #[error("search exhausted its step budget after {steps} steps")]
    Exhausted { steps: u64 },
    #[error("no path reaches the destination")]
    NoPath,
}
