//! Solution replay and committed execution.
//!
//! [`Plan`] re-derives per-step energy and feature annotations from a found
//! path without touching the universe. [`Voyage`] then applies the plan
//! through the universe's mutation surface, one step at a time.
//!
//! # Invariants
//! - `Plan::from_path` is read-only and uses the same feature-selection rule as the search.
//! - A wormhole exit reached by teleport costs nothing.
//! - Every committed step produces event records in the universe log.

mod plan;
mod voyage;

pub use plan::{Plan, PlannedStep, RunStats, SpecialAction, Transit};
pub use voyage::{StepStatus, Voyage};
