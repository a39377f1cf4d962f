//! Universe kernel: the grid, its features, and the vessel's committed voyage.
//!
//! # Invariants
//! - Queries never mutate. Search runs purely against the query surface.
//! - Black holes and wormholes are removed from the shared sets only by
//!   committed execution, and every such mutation is recorded as an event.
//! - Replaying the event log onto the pristine universe reproduces the
//!   committed state exactly.

pub mod scenario;
pub mod universe;

pub use scenario::{MIN_GIANT_STARS, Scenario, ScenarioError};
pub use universe::{EnergyEffect, MoveStatus, Universe, UniverseEvent};
