//! Shared types for the starpath engine.
//!
//! # Invariants
//! - Coordinates are signed so neighbor arithmetic never wraps; callers
//!   check bounds against the universe before use.
//! - Energy is an integer scalar; every committed step leaves it strictly
//!   positive.

mod error;
mod types;

pub use error::VoyageError;
pub use types::{Coord, Direction, Energy, MinChargeCell, RechargeZone, Wormhole};
