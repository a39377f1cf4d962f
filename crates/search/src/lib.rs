//! Route search: a backtracking explorer over universe states.
//!
//! # Invariants
//! - Search only reads the universe; tentative obstacle destruction and
//!   wormhole use live in branch-local state and are undone on backtrack.
//! - The visited-energy memo and step counter belong to one `find_path`
//!   call and never leak into the next.
//! - The first feasible route under Manhattan move ordering is returned.
//!   It is not guaranteed to be the shortest or the cheapest.
//!
//! # Known limitation
//! The memo prunes a cell reached with no more energy than before, without
//! looking at the branch that recorded it (path, destroyed black holes,
//! used wormholes). A route that only exists under a different branch
//! context can therefore be missed.

mod branch;
mod config;
mod engine;
mod memo;
mod moves;

pub use config::SearchConfig;
pub use engine::{Explorer, NoopObserver, SearchObserver, SearchStats, Solution};
pub use moves::ordered_moves;
