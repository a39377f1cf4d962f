//! Scenario files: the external description a universe is built from.
//!
//! Scenarios are read from JSON or YAML (chosen by file extension).
//! [`Universe::from_scenario`] performs the structural checks the engine
//! relies on; [`Scenario::validate_strict`] adds the schema rules of the
//! published format.

use crate::universe::Universe;
use serde::{Deserialize, Serialize};
use starpath_common::{Coord, Energy, MinChargeCell, RechargeZone, Wormhole};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Minimum number of giant stars a strictly valid scenario declares.
pub const MIN_GIANT_STARS: usize = 5;

/// Errors from loading or validating a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported scenario format: {0}")]
    UnsupportedFormat(String),
    #[error("cost matrix is {found_rows}x{found_cols}, grid is {rows}x{cols}")]
    DimensionMismatch {
        rows: i32,
        cols: i32,
        found_rows: usize,
        found_cols: usize,
    },
    #[error("{what} at {at} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        what: &'static str,
        at: Coord,
        rows: i32,
        cols: i32,
    },
    #[error("{what} at {at} must be positive, got {value}")]
    NonPositive {
        what: &'static str,
        at: Coord,
        value: Energy,
    },
    #[error("initial energy must be positive, got {0}")]
    NonPositiveEnergy(Energy),
    #[error("at least {min} giant stars required, found {0}", min = MIN_GIANT_STARS)]
    TooFewGiantStars(usize),
}

/// Serializable description of a universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub rows: i32,
    pub cols: i32,
    pub origin: Coord,
    pub destination: Coord,
    #[serde(default)]
    pub black_holes: Vec<Coord>,
    #[serde(default)]
    pub giant_stars: Vec<Coord>,
    #[serde(default)]
    pub wormholes: Vec<Wormhole>,
    #[serde(default)]
    pub recharge_zones: Vec<RechargeZone>,
    #[serde(default)]
    pub min_charge_cells: Vec<MinChargeCell>,
    pub initial_energy: Energy,
    /// Row-major cost matrix, `rows` rows of `cols` entries.
    pub costs: Vec<Vec<Energy>>,
}

impl Scenario {
    /// A featureless grid where every cell costs `cost`.
    pub fn uniform(
        rows: i32,
        cols: i32,
        cost: Energy,
        origin: Coord,
        destination: Coord,
        initial_energy: Energy,
    ) -> Self {
        let row = vec![cost; cols.max(0) as usize];
        Self {
            rows,
            cols,
            origin,
            destination,
            black_holes: Vec::new(),
            giant_stars: Vec::new(),
            wormholes: Vec::new(),
            recharge_zones: Vec::new(),
            min_charge_cells: Vec::new(),
            initial_energy,
            costs: vec![row; rows.max(0) as usize],
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load a scenario from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let scenario = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text)?,
            other => {
                return Err(ScenarioError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        };
        tracing::debug!(
            path = %path.display(),
            rows = scenario.rows,
            cols = scenario.cols,
            "scenario loaded"
        );
        Ok(scenario)
    }

    /// Save as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScenarioError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Schema rules beyond what the engine needs to run.
    pub fn validate_strict(&self) -> Result<(), ScenarioError> {
        if self.giant_stars.len() < MIN_GIANT_STARS {
            return Err(ScenarioError::TooFewGiantStars(self.giant_stars.len()));
        }
        Ok(())
    }

    fn check_bounds(&self, what: &'static str, at: Coord) -> Result<(), ScenarioError> {
        if at.row < 0 || at.row >= self.rows || at.col < 0 || at.col >= self.cols {
            return Err(ScenarioError::OutOfBounds {
                what,
                at,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    fn check_dimensions(&self) -> Result<Vec<Energy>, ScenarioError> {
        let found_cols = self.costs.first().map_or(0, Vec::len);
        let mismatch = self.rows <= 0
            || self.cols <= 0
            || self.costs.len() != self.rows as usize
            || self.costs.iter().any(|r| r.len() != self.cols as usize);
        if mismatch {
            return Err(ScenarioError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                found_rows: self.costs.len(),
                found_cols,
            });
        }
        let mut flat = Vec::with_capacity(self.costs.len() * found_cols);
        for (r, row) in self.costs.iter().enumerate() {
            for (c, &cost) in row.iter().enumerate() {
                if cost <= 0 {
                    return Err(ScenarioError::NonPositive {
                        what: "cell cost",
                        at: Coord::new(r as i32, c as i32),
                        value: cost,
                    });
                }
                flat.push(cost);
            }
        }
        Ok(flat)
    }
}

impl Universe {
    /// Build a universe from a scenario, checking the shape the engine relies on.
    ///
    /// When a coordinate is listed twice for the same feature, the first
    /// entry wins.
    pub fn from_scenario(s: &Scenario) -> Result<Self, ScenarioError> {
        let costs = s.check_dimensions()?;
        if s.initial_energy <= 0 {
            return Err(ScenarioError::NonPositiveEnergy(s.initial_energy));
        }
        s.check_bounds("origin", s.origin)?;
        s.check_bounds("destination", s.destination)?;

        let mut black_holes = BTreeSet::new();
        for &at in &s.black_holes {
            s.check_bounds("black hole", at)?;
            black_holes.insert(at);
        }
        let mut giant_stars = BTreeSet::new();
        for &at in &s.giant_stars {
            s.check_bounds("giant star", at)?;
            giant_stars.insert(at);
        }
        let mut wormholes = BTreeMap::new();
        for w in &s.wormholes {
            s.check_bounds("wormhole entrance", w.entrance)?;
            s.check_bounds("wormhole exit", w.exit)?;
            wormholes.entry(w.entrance).or_insert(w.exit);
        }
        let mut recharge_zones = BTreeMap::new();
        for z in &s.recharge_zones {
            s.check_bounds("recharge zone", z.at)?;
            if z.multiplier <= 0 {
                return Err(ScenarioError::NonPositive {
                    what: "recharge multiplier",
                    at: z.at,
                    value: z.multiplier,
                });
            }
            recharge_zones.entry(z.at).or_insert(z.multiplier);
        }
        let mut min_charge_cells = BTreeMap::new();
        for m in &s.min_charge_cells {
            s.check_bounds("min-charge cell", m.at)?;
            if m.threshold <= 0 {
                return Err(ScenarioError::NonPositive {
                    what: "min-charge threshold",
                    at: m.at,
                    value: m.threshold,
                });
            }
            min_charge_cells.entry(m.at).or_insert(m.threshold);
        }

        Ok(Universe::assemble(
            s.rows,
            s.cols,
            costs,
            s.origin,
            s.destination,
            black_holes,
            giant_stars,
            wormholes,
            recharge_zones,
            min_charge_cells,
            s.initial_energy,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"{
        "rows": 3,
        "cols": 3,
        "origin": [0, 0],
        "destination": [2, 2],
        "black_holes": [[1, 1]],
        "giant_stars": [[0, 1]],
        "wormholes": [{"entrance": [1, 0], "exit": [2, 1]}],
        "recharge_zones": [{"at": [0, 2], "multiplier": 2}],
        "min_charge_cells": [{"at": [1, 2], "threshold": 4}],
        "initial_energy": 10,
        "costs": [[1, 2, 3], [4, 5, 6], [7, 8, 9]]
    }"#;

    #[test]
    fn parse_json_scenario() {
        let s = Scenario::from_json_str(SAMPLE_JSON).unwrap();
        let u = Universe::from_scenario(&s).unwrap();
        assert_eq!(u.rows(), 3);
        assert_eq!(u.cost(Coord::new(2, 1)), 8);
        assert!(u.is_black_hole(Coord::new(1, 1)));
        assert_eq!(u.find_wormhole(Coord::new(1, 0)), Some(Coord::new(2, 1)));
        assert_eq!(u.initial_energy(), 10);
    }

    #[test]
    fn parse_yaml_scenario_with_defaults() {
        let yaml = "rows: 2\ncols: 2\norigin: [0, 0]\ndestination: [1, 1]\ninitial_energy: 5\ncosts:\n  - [1, 1]\n  - [1, 1]\n";
        let s = Scenario::from_yaml_str(yaml).unwrap();
        assert!(s.black_holes.is_empty());
        assert!(s.wormholes.is_empty());
        assert!(Universe::from_scenario(&s).is_ok());
    }

    #[test]
    fn rejects_mismatched_cost_matrix() {
        let mut s = Scenario::uniform(3, 3, 1, Coord::new(0, 0), Coord::new(2, 2), 10);
        s.costs[1].pop();
        assert!(matches!(
            Universe::from_scenario(&s),
            Err(ScenarioError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn rejects_out_of_bounds_features() {
        let mut s = Scenario::uniform(3, 3, 1, Coord::new(0, 0), Coord::new(2, 2), 10);
        s.wormholes.push(Wormhole {
            entrance: Coord::new(1, 1),
            exit: Coord::new(3, 0),
        });
        let err = Universe::from_scenario(&s).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::OutOfBounds {
                what: "wormhole exit",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_positive_values() {
        let mut s = Scenario::uniform(2, 2, 1, Coord::new(0, 0), Coord::new(1, 1), 10);
        s.costs[0][1] = 0;
        assert!(matches!(
            Universe::from_scenario(&s),
            Err(ScenarioError::NonPositive { what: "cell cost", .. })
        ));

        let s = Scenario::uniform(2, 2, 1, Coord::new(0, 0), Coord::new(1, 1), 0);
        assert!(matches!(
            Universe::from_scenario(&s),
            Err(ScenarioError::NonPositiveEnergy(0))
        ));
    }

    #[test]
    fn strict_validation_requires_giant_stars() {
        let mut s = Scenario::uniform(5, 5, 1, Coord::new(0, 0), Coord::new(4, 4), 10);
        assert!(matches!(
            s.validate_strict(),
            Err(ScenarioError::TooFewGiantStars(0))
        ));
        s.giant_stars = (0..5).map(|i| Coord::new(i, 2)).collect();
        assert!(s.validate_strict().is_ok());
    }

    #[test]
    fn first_duplicate_wins() {
        let mut s = Scenario::uniform(3, 3, 1, Coord::new(0, 0), Coord::new(2, 2), 10);
        s.wormholes.push(Wormhole {
            entrance: Coord::new(0, 1),
            exit: Coord::new(2, 0),
        });
        s.wormholes.push(Wormhole {
            entrance: Coord::new(0, 1),
            exit: Coord::new(1, 2),
        });
        let u = Universe::from_scenario(&s).unwrap();
        assert_eq!(u.find_wormhole(Coord::new(0, 1)), Some(Coord::new(2, 0)));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let s = Scenario::from_json_str(SAMPLE_JSON).unwrap();
        s.save(tmp.path()).unwrap();
        let loaded = Scenario::load(tmp.path()).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn bundled_scenarios_are_strictly_valid() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios");
        for name in ["demo.json", "corridor.yaml"] {
            let s = Scenario::load(dir.join(name)).unwrap();
            s.validate_strict().unwrap();
            Universe::from_scenario(&s).unwrap();
        }
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let tmp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            Scenario::load(tmp.path()),
            Err(ScenarioError::UnsupportedFormat(_))
        ));
    }
}
