use std::time::Duration;

use starpath_common::{Coord, Energy};
use starpath_kernel::{MoveStatus, Universe, UniverseEvent};

use crate::plan::{Plan, RunStats, Transit};

/// Outcome of one committed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Continue,
    DestinationReached,
    NoEnergy,
    Invalid,
    /// The plan ran out of steps before the destination.
    Incomplete,
}

impl StepStatus {
    /// True for every status after which no further step is taken.
    pub fn is_terminal(self) -> bool {
        self != Self::Continue
    }
}

impl From<MoveStatus> for StepStatus {
    fn from(status: MoveStatus) -> Self {
        match status {
            MoveStatus::Continue => Self::Continue,
            MoveStatus::DestinationReached => Self::DestinationReached,
            MoveStatus::NoEnergy => Self::NoEnergy,
            MoveStatus::Invalid => Self::Invalid,
        }
    }
}

/// Committed execution of a [`Plan`] against the shared universe.
///
/// Every step goes through [`Universe::move_to`], so black holes are
/// destroyed and wormholes consumed for good. Once a terminal status is
/// reported, later calls to [`Voyage::take_step`] repeat it.
pub struct Voyage<'a> {
    universe: &'a mut Universe,
    plan: &'a Plan,
    cursor: usize,
    halted: Option<StepStatus>,
    /// Index of this voyage's first event in the universe log.
    first_event: usize,
}

impl<'a> Voyage<'a> {
    /// Launch the ship at the origin and prepare to follow `plan`.
    pub fn begin(universe: &'a mut Universe, plan: &'a Plan) -> Self {
        let first_event = universe.events().len();
        universe.launch();
        let halted = (universe.ship_position() == universe.destination())
            .then_some(StepStatus::DestinationReached);
        tracing::debug!(steps = plan.len(), "voyage begun");
        Self {
            universe,
            plan,
            cursor: 0,
            halted,
            first_event,
        }
    }

    /// Apply the next planned step.
    pub fn take_step(&mut self) -> StepStatus {
        if let Some(status) = self.halted {
            return status;
        }
        let Some(step) = self.plan.steps().get(self.cursor) else {
            tracing::debug!(at = %self.universe.ship_position(), "plan ended short of the destination");
            self.halted = Some(StepStatus::Incomplete);
            return StepStatus::Incomplete;
        };
        self.cursor += 1;

        let status = match step.transit {
            // The move onto the entrance already carried the ship here.
            Some(Transit::Arrive { .. }) => self.verify_arrival(step.position),
            _ => self.universe.move_to(step.position).into(),
        };

        if matches!(status, StepStatus::Continue | StepStatus::DestinationReached)
            && self.universe.energy() != step.energy_after
        {
            tracing::warn!(
                at = %step.position,
                planned = step.energy_after,
                actual = self.universe.energy(),
                "committed energy differs from plan"
            );
        }
        if status.is_terminal() {
            self.halted = Some(status);
        }
        status
    }

    fn verify_arrival(&self, expected: Coord) -> StepStatus {
        let at = self.universe.ship_position();
        if at != expected {
            tracing::warn!(%expected, %at, "ship is not at the planned wormhole exit");
            StepStatus::Invalid
        } else if at == self.universe.destination() {
            StepStatus::DestinationReached
        } else {
            StepStatus::Continue
        }
    }

    /// Take steps until a terminal status.
    pub fn run_to_end(&mut self) -> StepStatus {
        loop {
            let status = self.take_step();
            if status.is_terminal() {
                return status;
            }
        }
    }

    pub fn position(&self) -> Coord {
        self.universe.ship_position()
    }

    pub fn energy(&self) -> Energy {
        self.universe.energy()
    }

    /// Planned steps not yet taken.
    pub fn remaining(&self) -> usize {
        self.plan.len() - self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.halted.is_some()
    }

    pub fn universe(&self) -> &Universe {
        self.universe
    }

    /// Events committed since [`Voyage::begin`].
    pub fn events(&self) -> &[UniverseEvent] {
        &self.universe.events()[self.first_event..]
    }

    /// Run statistics accumulated from this voyage's events.
    pub fn stats(&self, search_time: Duration) -> RunStats {
        let mut stats = RunStats {
            search_time,
            ..RunStats::default()
        };
        for event in self.events() {
            match event {
                UniverseEvent::ShipMoved {
                    to,
                    energy_before,
                    energy_after,
                    ..
                } => {
                    stats.total_steps += 1;
                    if self.universe.find_recharge_zone(*to).is_some() {
                        stats.recharges += 1;
                    }
                    if energy_after < energy_before {
                        stats.energy_consumed += energy_before - energy_after;
                    }
                }
                UniverseEvent::ShipTeleported { .. } => stats.total_steps += 1,
                UniverseEvent::WormholeConsumed { .. } => stats.wormholes_used += 1,
                UniverseEvent::BlackHoleDestroyed { .. } => stats.black_holes_destroyed += 1,
                UniverseEvent::Launched { .. } => {}
            }
        }
        stats
    }
}
