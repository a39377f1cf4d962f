use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use starpath_common::{Coord, Energy};
use starpath_kernel::{EnergyEffect, Universe};

/// Energy feature applied when entering a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpecialAction {
    Recharge { multiplier: Energy },
    MinCharge { threshold: Energy },
}

impl fmt::Display for SpecialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recharge { multiplier } => write!(f, "recharge x{multiplier}"),
            Self::MinCharge { threshold } => write!(f, "min-charge {threshold}"),
        }
    }
}

/// Wormhole role of a step. Annotated independently of [`SpecialAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transit {
    /// The step enters a wormhole; the next step is its exit.
    Enter { exit: Coord },
    /// The step is the exit reached by teleport. Costs nothing.
    Arrive { entrance: Coord },
}

impl fmt::Display for Transit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter { exit } => write!(f, "wormhole -> {exit}"),
            Self::Arrive { entrance } => write!(f, "wormhole exit from {entrance}"),
        }
    }
}

/// One step of a solution, as committed execution will see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub position: Coord,
    pub energy_after: Energy,
    pub energy_delta: Energy,
    pub action: Option<SpecialAction>,
    pub transit: Option<Transit>,
    /// Black hole a giant star at this step's landing cell removes.
    pub destroys: Option<Coord>,
}

impl PlannedStep {
    /// Human-readable annotation, or `None` for a plain step.
    pub fn label(&self) -> Option<String> {
        match (self.action, self.transit) {
            (None, None) => None,
            (Some(a), None) => Some(a.to_string()),
            (None, Some(t)) => Some(t.to_string()),
            (Some(a), Some(t)) => Some(format!("{a}, {t}")),
        }
    }
}

/// Run statistics for a solved voyage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total_steps: usize,
    pub black_holes_destroyed: usize,
    pub wormholes_used: usize,
    pub recharges: usize,
    pub energy_consumed: Energy,
    pub search_time: Duration,
}

/// Step descriptors re-derived from a found path.
///
/// Built read-only against the universe with the same feature-selection rule
/// the search uses ([`Universe::energy_effect`]). Giant-star destructions
/// follow committed semantics: the first adjacent black hole still standing
/// at that point of the voyage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    initial_energy: Energy,
    launch_destroys: Option<Coord>,
    steps: Vec<PlannedStep>,
}

impl Plan {
    /// Walk `path` from its second element and describe every step.
    ///
    /// A path element is a teleport arrival when the element before it was
    /// entered by a normal step and is a wormhole entrance whose exit is this
    /// element. A cell reached by teleport is expanded normally, so the step
    /// after it never counts as a transit.
    pub fn from_path(universe: &Universe, path: &[Coord]) -> Self {
        let initial_energy = universe.initial_energy();
        let mut destroyed = BTreeSet::new();

        let launch_destroys = match path.first() {
            Some(&origin) => ignite(universe, origin, &mut destroyed),
            None => None,
        };

        let arrivals = teleport_arrivals(universe, path);
        let mut energy = initial_energy;
        let mut steps = Vec::with_capacity(path.len().saturating_sub(1));

        for i in 1..path.len() {
            let position = path[i];
            let before = energy;

            let (action, transit) = if arrivals[i] {
                (
                    None,
                    Some(Transit::Arrive {
                        entrance: path[i - 1],
                    }),
                )
            } else {
                let effect = universe.energy_effect(position);
                energy = effect.resulting_energy(energy);
                let action = match effect {
                    EnergyEffect::Recharge { multiplier } => {
                        Some(SpecialAction::Recharge { multiplier })
                    }
                    EnergyEffect::MinCharge { threshold } => {
                        Some(SpecialAction::MinCharge { threshold })
                    }
                    EnergyEffect::Flat { .. } => None,
                };
                let transit = arrivals
                    .get(i + 1)
                    .copied()
                    .unwrap_or(false)
                    .then(|| Transit::Enter { exit: path[i + 1] });
                (action, transit)
            };

            // Stars fire where the ship lands; an entrance is only passed through.
            let destroys = match transit {
                Some(Transit::Enter { .. }) => None,
                _ => ignite(universe, position, &mut destroyed),
            };

            steps.push(PlannedStep {
                position,
                energy_after: energy,
                energy_delta: energy - before,
                action,
                transit,
                destroys,
            });
        }

        tracing::debug!(steps = steps.len(), final_energy = energy, "plan derived");
        Self {
            initial_energy,
            launch_destroys,
            steps,
        }
    }

    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Black hole destroyed by a giant star at the origin when the voyage launches.
    pub fn launch_destroys(&self) -> Option<Coord> {
        self.launch_destroys
    }

    /// Energy left after the last step.
    pub fn final_energy(&self) -> Energy {
        self.steps
            .last()
            .map_or(self.initial_energy, |s| s.energy_after)
    }

    /// The six run statistics, with `elapsed` as the search time.
    pub fn stats(&self, elapsed: Duration) -> RunStats {
        let mut stats = RunStats {
            total_steps: self.steps.len(),
            black_holes_destroyed: usize::from(self.launch_destroys.is_some()),
            search_time: elapsed,
            ..RunStats::default()
        };
        for step in &self.steps {
            if step.destroys.is_some() {
                stats.black_holes_destroyed += 1;
            }
            if matches!(step.transit, Some(Transit::Enter { .. })) {
                stats.wormholes_used += 1;
            }
            if matches!(step.action, Some(SpecialAction::Recharge { .. })) {
                stats.recharges += 1;
            }
            if step.energy_delta < 0 {
                stats.energy_consumed += -step.energy_delta;
            }
        }
        stats
    }
}

/// `arrivals[i]` is true when `path[i]` was reached by teleport.
fn teleport_arrivals(universe: &Universe, path: &[Coord]) -> Vec<bool> {
    let mut arrivals = vec![false; path.len()];
    for i in 2..path.len() {
        arrivals[i] = !arrivals[i - 1] && universe.find_wormhole(path[i - 1]) == Some(path[i]);
    }
    arrivals
}

/// Giant-star effect at `at` against the black holes still standing.
fn ignite(universe: &Universe, at: Coord, destroyed: &mut BTreeSet<Coord>) -> Option<Coord> {
    if !universe.is_giant_star(at) {
        return None;
    }
    let target = at
        .neighbors()
        .into_iter()
        .find(|n| universe.is_black_hole(*n) && !destroyed.contains(n))?;
    destroyed.insert(target);
    Some(target)
}
