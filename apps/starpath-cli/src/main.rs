use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use starpath_common::{Coord, Energy};
use starpath_kernel::{MIN_GIANT_STARS, Scenario, Universe};
use starpath_replay::{Plan, StepStatus, Voyage};
use starpath_search::{Explorer, SearchConfig, SearchObserver};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "starpath", about = "Route a vessel across a weighted star grid")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and defaults
    Info,
    /// Load a scenario and check it
    Validate {
        /// Scenario file (.json, .yaml or .yml)
        scenario: PathBuf,
        /// Skip the schema rules the engine does not need
        #[arg(long)]
        lenient: bool,
    },
    /// Search for a route, then execute it against the universe
    Solve {
        /// Scenario file (.json, .yaml or .yml)
        scenario: PathBuf,
        /// Maximum cell visits before giving up
        #[arg(long)]
        step_cap: Option<u64>,
        /// Skip the schema rules the engine does not need
        #[arg(long)]
        lenient: bool,
        /// Log progress every N expansions (0 = never)
        #[arg(long, default_value = "0")]
        progress: u64,
        /// Print the plan as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Logs a progress line every `every` expansions.
struct Progress {
    every: u64,
    seen: u64,
}

impl SearchObserver for Progress {
    fn on_expand(&mut self, at: Coord, energy: Energy, depth: usize) {
        self.seen += 1;
        if self.every > 0 && self.seen % self.every == 0 {
            tracing::info!(expansions = self.seen, %at, energy, depth, "searching");
        }
    }
}

fn load(path: &Path, lenient: bool) -> anyhow::Result<Universe> {
    let scenario =
        Scenario::load(path).with_context(|| format!("loading {}", path.display()))?;
    if !lenient {
        scenario.validate_strict()?;
    }
    Ok(Universe::from_scenario(&scenario)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("starpath v{}", env!("CARGO_PKG_VERSION"));
            println!("default step cap: {}", SearchConfig::default().step_cap);
            println!("strict scenarios need {MIN_GIANT_STARS} giant stars");
        }
        Commands::Validate { scenario, lenient } => {
            let universe = load(&scenario, lenient)?;
            println!(
                "{}: {}x{} grid, {} -> {}, energy {}",
                scenario.display(),
                universe.rows(),
                universe.cols(),
                universe.origin(),
                universe.destination(),
                universe.initial_energy()
            );
            println!(
                "black holes={}, giant stars={}, wormholes={}",
                universe.black_holes().count(),
                universe.giant_stars().count(),
                universe.wormholes().count()
            );
            println!("Valid: OK");
        }
        Commands::Solve {
            scenario,
            step_cap,
            lenient,
            progress,
            json,
        } => {
            let mut universe = load(&scenario, lenient)?;
            let pristine = universe.clone();

            let mut config = SearchConfig::default();
            if let Some(cap) = step_cap {
                config.step_cap = cap;
            }
            let mut observer = Progress {
                every: progress,
                seen: 0,
            };
            let mut explorer = Explorer::new(&pristine, config);
            let found = explorer.find_path_with(&mut observer);
            let search = explorer.stats().clone();
            println!(
                "Search: calls={}, expansions={}, pruned={}, max depth={}, {:?}",
                search.calls, search.expansions, search.pruned, search.max_depth, search.elapsed
            );
            let solution = found.context("no route")?;

            let plan = Plan::from_path(&pristine, &solution.path);
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("  0 {} energy={}", universe.origin(), universe.initial_energy());
                for (i, step) in plan.steps().iter().enumerate() {
                    print!(
                        "{:>3} {} energy={} ({:+})",
                        i + 1,
                        step.position,
                        step.energy_after,
                        step.energy_delta
                    );
                    if let Some(label) = step.label() {
                        print!(" {label}");
                    }
                    if let Some(bh) = step.destroys {
                        print!(" destroys {bh}");
                    }
                    println!();
                }
            }

            let mut voyage = Voyage::begin(&mut universe, &plan);
            let status = voyage.run_to_end();
            let stats = voyage.stats(search.elapsed);
            println!("Voyage: {status:?}, energy={}", voyage.energy());
            println!(
                "Stats: steps={}, black holes destroyed={}, wormholes used={}, recharges={}, energy consumed={}, search time={:?}",
                stats.total_steps,
                stats.black_holes_destroyed,
                stats.wormholes_used,
                stats.recharges,
                stats.energy_consumed,
                stats.search_time
            );

            let replayed = Universe::replay(&pristine, universe.events());
            println!(
                "Match: {}",
                if replayed.state_hash() == universe.state_hash() {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );

            if status != StepStatus::DestinationReached {
                anyhow::bail!("voyage stopped early: {status:?}");
            }
        }
    }

    Ok(())
}
