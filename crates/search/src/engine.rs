use std::time::{Duration, Instant};

use starpath_common::{Coord, Energy, VoyageError};
use starpath_kernel::Universe;

use crate::branch::BranchState;
use crate::config::SearchConfig;
use crate::memo::VisitedMemo;
use crate::moves::ordered_moves;

/// Hook called between expansions.
///
/// A host can use it to interleave other work or animate progress. It has
/// no influence on the search outcome or its ordering.
pub trait SearchObserver {
    fn on_expand(&mut self, _at: Coord, _energy: Energy, _depth: usize) {}
}

/// Observer that does nothing.
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// A feasible route from origin to destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Visited cells in order. A wormhole transit appears as the entrance
    /// followed by its exit.
    pub path: Vec<Coord>,
    /// Energy on arrival at the destination.
    pub final_energy: Energy,
}

/// Counters from the last search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Cell visits made, including the ones refused immediately.
    pub calls: u64,
    /// Calls that passed every terminal check and the memo, and expanded.
    pub expansions: u64,
    /// Calls refused by the visited-energy memo.
    pub pruned: u64,
    /// Longest branch path seen.
    pub max_depth: usize,
    /// Distinct cells recorded in the memo.
    pub memo_cells: usize,
    pub elapsed: Duration,
}

/// Backtracking explorer over a universe.
///
/// Reads the universe only. Each `find_path` call builds a fresh run context
/// (memo, step counter, branch state), so repeated calls are independent.
pub struct Explorer<'u> {
    universe: &'u Universe,
    config: SearchConfig,
    stats: SearchStats,
}

impl<'u> Explorer<'u> {
    pub fn new(universe: &'u Universe, config: SearchConfig) -> Self {
        Self {
            universe,
            config,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Statistics from the last `find_path` call.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Search for a route from the origin to the destination.
    pub fn find_path(&mut self) -> Result<Solution, VoyageError> {
        self.find_path_with(&mut NoopObserver)
    }

    /// Search for a route, calling `observer` before every expansion.
    pub fn find_path_with(
        &mut self,
        observer: &mut dyn SearchObserver,
    ) -> Result<Solution, VoyageError> {
        let origin = self.universe.origin();
        let destination = self.universe.destination();
        let _span = tracing::info_span!("find_path", %origin, %destination).entered();
        let started = Instant::now();

        let mut run = SearchRun::new(self.universe, self.config.step_cap, observer);
        let found = run.explore(origin, self.universe.initial_energy());
        debug_assert!(
            found.is_some() || (run.stack.is_empty() && run.branch.is_unwound()),
            "failed search left branch state behind"
        );

        let mut stats = run.stats;
        stats.memo_cells = run.memo.len();
        stats.elapsed = started.elapsed();
        let exhausted = run.exhausted;
        self.stats = stats;

        match found {
            Some(solution) => {
                tracing::debug!(
                    steps = solution.path.len() - 1,
                    final_energy = solution.final_energy,
                    calls = self.stats.calls,
                    elapsed = ?self.stats.elapsed,
                    "route found"
                );
                Ok(solution)
            }
            None if exhausted => {
                tracing::debug!(calls = self.stats.calls, "step budget exhausted");
                Err(VoyageError::Exhausted {
                    steps: self.stats.calls,
                })
            }
            None => {
                tracing::debug!(
                    calls = self.stats.calls,
                    pruned = self.stats.pruned,
                    "search space exhausted without a route"
                );
                Err(VoyageError::NoPath)
            }
        }
    }
}

/// One expanded cell on the explicit search stack.
struct Frame {
    at: Coord,
    energy: Energy,
    moves: [Coord; 4],
    /// Index of the next candidate in `moves`.
    next: usize,
    /// Black hole this cell's giant star destroyed in the branch.
    ignited: Option<Coord>,
    /// Wormhole entrance this cell was reached through.
    via: Option<Coord>,
}

/// Outcome of entering a cell.
enum Visit {
    Found(Solution),
    Refused,
    Expanded,
}

/// Context for one `find_path` invocation.
///
/// Depth-first search with an explicit frame stack, so route length is
/// bounded by heap memory rather than the thread stack.
struct SearchRun<'a> {
    universe: &'a Universe,
    destination: Coord,
    step_cap: u64,
    memo: VisitedMemo,
    branch: BranchState,
    stack: Vec<Frame>,
    exhausted: bool,
    stats: SearchStats,
    observer: &'a mut dyn SearchObserver,
}

impl<'a> SearchRun<'a> {
    fn new(universe: &'a Universe, step_cap: u64, observer: &'a mut dyn SearchObserver) -> Self {
        Self {
            universe,
            destination: universe.destination(),
            step_cap,
            memo: VisitedMemo::default(),
            branch: BranchState::default(),
            stack: Vec::new(),
            exhausted: false,
            stats: SearchStats::default(),
            observer,
        }
    }

    fn explore(&mut self, origin: Coord, energy: Energy) -> Option<Solution> {
        match self.visit(origin, energy, None) {
            Visit::Found(solution) => return Some(solution),
            Visit::Refused => return None,
            Visit::Expanded => {}
        }

        while let Some(frame) = self.stack.last_mut() {
            if self.exhausted || frame.next == frame.moves.len() {
                self.backtrack();
                continue;
            }
            let next = frame.moves[frame.next];
            frame.next += 1;
            let energy = frame.energy;
            if let Some(solution) = self.try_move(energy, next) {
                return Some(solution);
            }
        }
        None
    }

    /// Terminal checks, memo and expansion of `at`. An expanded cell is
    /// pushed as a frame; a refused one reached through a wormhole gives the
    /// entrance back immediately.
    fn visit(&mut self, at: Coord, energy: Energy, via: Option<Coord>) -> Visit {
        self.stats.calls += 1;

        if at == self.destination {
            return Visit::Found(Solution {
                path: self.branch.path_to(at),
                final_energy: energy,
            });
        }
        let refused = if energy <= 0 {
            true
        } else if self.stats.calls > self.step_cap {
            self.exhausted = true;
            true
        } else if !self.memo.admit(at, energy) {
            self.stats.pruned += 1;
            tracing::trace!(%at, energy, "pruned");
            true
        } else {
            false
        };
        if refused {
            if let Some(entrance) = via {
                self.release_entrance(entrance);
            }
            return Visit::Refused;
        }

        self.stats.expansions += 1;
        self.observer.on_expand(at, energy, self.branch.depth());
        self.branch.enter(at);
        self.stats.max_depth = self.stats.max_depth.max(self.branch.depth());
        tracing::trace!(%at, energy, depth = self.branch.depth(), "expand");

        let ignited = self.ignite(at);
        self.stack.push(Frame {
            at,
            energy,
            moves: ordered_moves(at, self.destination),
            next: 0,
            ignited,
            via,
        });
        Visit::Expanded
    }

    /// Pop the top frame and undo everything it did, newest first.
    fn backtrack(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if let Some(black_hole) = frame.ignited {
            self.branch.restore(black_hole);
        }
        self.branch.leave(frame.at);
        if let Some(entrance) = frame.via {
            self.release_entrance(entrance);
        }
    }

    fn release_entrance(&mut self, entrance: Coord) {
        self.branch.leave(entrance);
        self.branch.release_wormhole(entrance);
    }

    /// Branch-local giant-star effect at `at`. Returns the black hole to restore.
    fn ignite(&mut self, at: Coord) -> Option<Coord> {
        if !self.universe.is_giant_star(at) {
            return None;
        }
        let black_hole = self.universe.can_destroy_black_hole(at)?;
        if self.branch.is_destroyed(black_hole) {
            return None;
        }
        tracing::trace!(star = %at, %black_hole, "black hole destroyed in branch");
        self.branch.destroy(black_hole);
        Some(black_hole)
    }

    /// Check a candidate and enter it. Returns a solution if it completes the route.
    fn try_move(&mut self, energy: Energy, next: Coord) -> Option<Solution> {
        let universe = self.universe;
        if !universe.is_valid_cell(next) {
            return None;
        }
        if universe.is_black_hole(next) && !self.branch.is_destroyed(next) {
            return None;
        }
        if self.branch.on_path(next) {
            return None;
        }

        let next_energy = match universe.energy_effect(next).apply(next, energy) {
            Ok(e) => e,
            Err(err) => {
                tracing::trace!(%next, %err, "move refused");
                return None;
            }
        };

        let visit = match universe.find_wormhole(next) {
            Some(exit) if !self.branch.wormhole_used(next) => {
                if self.branch.on_path(exit) {
                    return None;
                }
                self.branch.use_wormhole(next);
                self.branch.enter(next);
                self.visit(exit, next_energy, Some(next))
            }
            _ => self.visit(next, next_energy, None),
        };
        match visit {
            Visit::Found(solution) => Some(solution),
            Visit::Refused | Visit::Expanded => None,
        }
    }
}
