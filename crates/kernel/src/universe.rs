use serde::{Deserialize, Serialize};
use starpath_common::{Coord, Energy, VoyageError};
use std::collections::{BTreeMap, BTreeSet};

/// An event record produced by every committed mutation to the universe.
///
/// The log is the foundation for replay and determinism checks. Speculative
/// search never produces events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniverseEvent {
    /// Ship placed at the origin with its initial energy.
    Launched { origin: Coord, energy: Energy },
    /// Ship entered a cell and paid (or gained) energy for it.
    ShipMoved {
        from: Coord,
        to: Coord,
        energy_before: Energy,
        energy_after: Energy,
    },
    /// Wormhole removed from the shared set after its first traversal.
    WormholeConsumed { entrance: Coord, exit: Coord },
    /// Ship carried from a wormhole entrance to its exit.
    ShipTeleported { from: Coord, to: Coord },
    /// Black hole removed from the shared set.
    BlackHoleDestroyed { at: Coord },
}

/// How entering a cell changes the vessel's energy.
///
/// This is the single feature-selection rule shared by search, solution
/// replay and committed moves: a recharge zone wins over a min-charge cell,
/// which wins over the matrix cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyEffect {
    /// Energy is multiplied.
    Recharge { multiplier: Energy },
    /// Needs at least `threshold` energy and costs exactly `threshold`.
    MinCharge { threshold: Energy },
    /// Costs the cell's matrix value.
    Flat { cost: Energy },
}

impl EnergyEffect {
    /// Energy after entering, without any feasibility checks.
    pub fn resulting_energy(self, energy: Energy) -> Energy {
        match self {
            Self::Recharge { multiplier } => energy.saturating_mul(multiplier),
            Self::MinCharge { threshold } => energy - threshold,
            Self::Flat { cost } => energy - cost,
        }
    }

    /// Energy after entering `at`, or why the move cannot be made.
    ///
    /// A move that would leave zero or negative energy is refused, even onto
    /// the destination.
    pub fn apply(self, at: Coord, energy: Energy) -> Result<Energy, VoyageError> {
        if let Self::MinCharge { threshold } = self {
            if energy < threshold {
                return Err(VoyageError::InsufficientEnergy {
                    at,
                    required: threshold,
                    available: energy,
                });
            }
        }
        let after = self.resulting_energy(energy);
        if after <= 0 {
            return Err(VoyageError::InsufficientEnergy {
                at,
                required: self.required_energy(),
                available: energy,
            });
        }
        Ok(after)
    }

    /// Smallest starting energy for which `apply` succeeds.
    fn required_energy(self) -> Energy {
        match self {
            Self::Recharge { .. } => 1,
            Self::MinCharge { threshold } => threshold.saturating_add(1),
            Self::Flat { cost } => cost.saturating_add(1),
        }
    }
}

/// Outcome of a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    Continue,
    DestinationReached,
    NoEnergy,
    Invalid,
}

#[derive(Debug, Clone)]
struct Ship {
    position: Coord,
    energy: Energy,
    trail: Vec<Coord>,
}

impl Ship {
    fn docked(origin: Coord, energy: Energy) -> Self {
        Self {
            position: origin,
            energy,
            trail: vec![origin],
        }
    }
}

/// The authoritative universe: grid, feature sets and the committed voyage.
///
/// Feature sets live in BTree collections for deterministic iteration and
/// hashing. Construct one with [`Universe::from_scenario`].
#[derive(Debug, Clone)]
pub struct Universe {
    pub(crate) rows: i32,
    pub(crate) cols: i32,
    /// Row-major cost matrix.
    pub(crate) costs: Vec<Energy>,
    pub(crate) origin: Coord,
    pub(crate) destination: Coord,
    pub(crate) black_holes: BTreeSet<Coord>,
    pub(crate) giant_stars: BTreeSet<Coord>,
    /// Entrance -> exit.
    pub(crate) wormholes: BTreeMap<Coord, Coord>,
    pub(crate) recharge_zones: BTreeMap<Coord, Energy>,
    pub(crate) min_charge_cells: BTreeMap<Coord, Energy>,
    pub(crate) initial_energy: Energy,
    ship: Ship,
    /// Append-only log of committed mutations.
    event_log: Vec<UniverseEvent>,
}

impl Universe {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        rows: i32,
        cols: i32,
        costs: Vec<Energy>,
        origin: Coord,
        destination: Coord,
        black_holes: BTreeSet<Coord>,
        giant_stars: BTreeSet<Coord>,
        wormholes: BTreeMap<Coord, Coord>,
        recharge_zones: BTreeMap<Coord, Energy>,
        min_charge_cells: BTreeMap<Coord, Energy>,
        initial_energy: Energy,
    ) -> Self {
        Self {
            rows,
            cols,
            costs,
            origin,
            destination,
            black_holes,
            giant_stars,
            wormholes,
            recharge_zones,
            min_charge_cells,
            initial_energy,
            ship: Ship::docked(origin, initial_energy),
            event_log: Vec::new(),
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn destination(&self) -> Coord {
        self.destination
    }

    pub fn initial_energy(&self) -> Energy {
        self.initial_energy
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.costs.len()
    }

    // ---- query surface ----

    /// True when `at` lies inside the grid.
    pub fn is_valid_cell(&self, at: Coord) -> bool {
        at.row >= 0 && at.row < self.rows && at.col >= 0 && at.col < self.cols
    }

    pub fn is_black_hole(&self, at: Coord) -> bool {
        self.black_holes.contains(&at)
    }

    pub fn is_giant_star(&self, at: Coord) -> bool {
        self.giant_stars.contains(&at)
    }

    /// First black hole adjacent to `at`, scanning up, right, down, left.
    pub fn can_destroy_black_hole(&self, at: Coord) -> Option<Coord> {
        at.neighbors()
            .into_iter()
            .find(|n| self.is_valid_cell(*n) && self.is_black_hole(*n))
    }

    /// Recharge multiplier at `at`, if it is a recharge zone.
    pub fn find_recharge_zone(&self, at: Coord) -> Option<Energy> {
        self.recharge_zones.get(&at).copied()
    }

    /// Required threshold at `at`, if it is a min-charge cell.
    pub fn find_min_charge_cell(&self, at: Coord) -> Option<Energy> {
        self.min_charge_cells.get(&at).copied()
    }

    /// Exit of the wormhole whose entrance is `at`, if one is still present.
    pub fn find_wormhole(&self, at: Coord) -> Option<Coord> {
        self.wormholes.get(&at).copied()
    }

    /// Matrix cost of `at`.
    ///
    /// # Panics
    /// If `at` is outside the grid; check with [`Universe::is_valid_cell`] first.
    pub fn cost(&self, at: Coord) -> Energy {
        debug_assert!(self.is_valid_cell(at), "cost queried outside grid at {at}");
        self.costs[(at.row * self.cols + at.col) as usize]
    }

    /// The energy rule that applies when entering `at`.
    pub fn energy_effect(&self, at: Coord) -> EnergyEffect {
        if let Some(multiplier) = self.find_recharge_zone(at) {
            EnergyEffect::Recharge { multiplier }
        } else if let Some(threshold) = self.find_min_charge_cell(at) {
            EnergyEffect::MinCharge { threshold }
        } else {
            EnergyEffect::Flat {
                cost: self.cost(at),
            }
        }
    }

    pub fn black_holes(&self) -> impl Iterator<Item = Coord> + '_ {
        self.black_holes.iter().copied()
    }

    pub fn giant_stars(&self) -> impl Iterator<Item = Coord> + '_ {
        self.giant_stars.iter().copied()
    }

    /// Remaining wormholes as (entrance, exit) pairs.
    pub fn wormholes(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.wormholes.iter().map(|(e, x)| (*e, *x))
    }

    // ---- committed voyage ----

    pub fn ship_position(&self) -> Coord {
        self.ship.position
    }

    pub fn energy(&self) -> Energy {
        self.ship.energy
    }

    /// Cells the ship has occupied since launch, in order.
    pub fn trail(&self) -> &[Coord] {
        &self.ship.trail
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[UniverseEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<UniverseEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Put the ship back at the origin with its initial energy.
    ///
    /// Destroyed black holes and consumed wormholes stay gone.
    pub fn reset_voyage(&mut self) {
        self.ship = Ship::docked(self.origin, self.initial_energy);
    }

    /// Start a committed voyage: reset the ship and let a giant star at the
    /// origin destroy its first adjacent black hole.
    pub fn launch(&mut self) -> Option<Coord> {
        self.reset_voyage();
        self.event_log.push(UniverseEvent::Launched {
            origin: self.origin,
            energy: self.initial_energy,
        });
        tracing::debug!(origin = %self.origin, energy = self.initial_energy, "launched");
        self.ignite_giant_star(self.origin)
    }

    /// Remove a black hole from the shared set. No-op if absent.
    pub fn destroy_black_hole(&mut self, at: Coord) -> bool {
        if self.black_holes.remove(&at) {
            tracing::debug!(%at, "black hole destroyed");
            self.event_log.push(UniverseEvent::BlackHoleDestroyed { at });
            true
        } else {
            false
        }
    }

    /// Remove the wormhole entered at `at` and return its exit.
    pub fn consume_wormhole(&mut self, at: Coord) -> Option<Coord> {
        let exit = self.wormholes.remove(&at)?;
        tracing::debug!(entrance = %at, %exit, "wormhole consumed");
        self.event_log.push(UniverseEvent::WormholeConsumed { entrance: at, exit });
        Some(exit)
    }

    /// If `at` is a giant star, destroy its first adjacent black hole.
    fn ignite_giant_star(&mut self, at: Coord) -> Option<Coord> {
        if !self.is_giant_star(at) {
            return None;
        }
        let target = self.can_destroy_black_hole(at)?;
        self.destroy_black_hole(target);
        Some(target)
    }

    /// Commit one move of the ship to the adjacent cell `to`.
    ///
    /// Energy is computed with [`Universe::energy_effect`] against the
    /// current shared state. Refused moves leave the universe untouched.
    /// Entering a wormhole consumes it and lands the ship on its exit; a
    /// giant star at the landing cell then fires.
    pub fn move_to(&mut self, to: Coord) -> MoveStatus {
        let from = self.ship.position;
        if let Err(err) = self.check_entry(from, to) {
            tracing::debug!(%from, %to, %err, "invalid move");
            return MoveStatus::Invalid;
        }

        let energy_before = self.ship.energy;
        let energy_after = match self.energy_effect(to).apply(to, energy_before) {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(%from, %to, %err, "not enough energy");
                return MoveStatus::NoEnergy;
            }
        };

        self.ship.energy = energy_after;
        self.ship.position = to;
        self.ship.trail.push(to);
        self.event_log.push(UniverseEvent::ShipMoved {
            from,
            to,
            energy_before,
            energy_after,
        });
        tracing::debug!(%from, %to, energy_before, energy_after, "ship moved");

        if let Some(exit) = self.consume_wormhole(to) {
            self.ship.position = exit;
            self.ship.trail.push(exit);
            self.event_log
                .push(UniverseEvent::ShipTeleported { from: to, to: exit });
        }

        let landing = self.ship.position;
        self.ignite_giant_star(landing);

        if landing == self.destination {
            tracing::debug!(%landing, energy = self.ship.energy, "destination reached");
            MoveStatus::DestinationReached
        } else {
            MoveStatus::Continue
        }
    }

    fn check_entry(&self, from: Coord, to: Coord) -> Result<(), VoyageError> {
        if !self.is_valid_cell(to) {
            return Err(VoyageError::InvalidCoordinate(to));
        }
        if !from.is_adjacent(to) || self.is_black_hole(to) || self.ship.trail.contains(&to) {
            return Err(VoyageError::Blocked(to));
        }
        Ok(())
    }

    /// Rebuild committed state by replaying `events` onto a pristine universe.
    pub fn replay(base: &Universe, events: &[UniverseEvent]) -> Self {
        let mut universe = base.clone();
        universe.reset_voyage();
        universe.event_log.clear();
        for event in events {
            match event {
                UniverseEvent::Launched { origin, energy } => {
                    universe.ship = Ship::docked(*origin, *energy);
                }
                UniverseEvent::ShipMoved {
                    to, energy_after, ..
                } => {
                    universe.ship.position = *to;
                    universe.ship.energy = *energy_after;
                    universe.ship.trail.push(*to);
                }
                UniverseEvent::WormholeConsumed { entrance, .. } => {
                    universe.wormholes.remove(entrance);
                }
                UniverseEvent::ShipTeleported { to, .. } => {
                    universe.ship.position = *to;
                    universe.ship.trail.push(*to);
                }
                UniverseEvent::BlackHoleDestroyed { at } => {
                    universe.black_holes.remove(at);
                }
            }
        }
        universe
    }

    /// Deterministic hash of the mutable state (feature sets and ship).
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_coord = |h: &mut u64, c: Coord| {
            mix(h, &c.row.to_le_bytes());
            mix(h, &c.col.to_le_bytes());
        };
        for bh in &self.black_holes {
            mix_coord(&mut h, *bh);
        }
        mix(&mut h, b"|");
        for (entrance, exit) in &self.wormholes {
            mix_coord(&mut h, *entrance);
            mix_coord(&mut h, *exit);
        }
        mix(&mut h, b"|");
        mix_coord(&mut h, self.ship.position);
        mix(&mut h, &self.ship.energy.to_le_bytes());
        for c in &self.ship.trail {
            mix_coord(&mut h, *c);
        }
        h
    }
}
