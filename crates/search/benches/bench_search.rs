use std::hint::black_box;
use std::time::Instant;

use starpath_common::{Coord, Energy};
use starpath_kernel::{Scenario, Universe};
use starpath_search::{Explorer, SearchConfig};

fn open_grid(size: i32) -> Universe {
    let s = Scenario::uniform(
        size,
        size,
        1,
        Coord::new(0, 0),
        Coord::new(size - 1, size - 1),
        (size * size) as Energy,
    );
    Universe::from_scenario(&s).expect("valid scenario")
}

/// Walls on every odd row with a gap at alternating ends.
fn serpentine(size: i32) -> Universe {
    let mut s = Scenario::uniform(
        size,
        size,
        1,
        Coord::new(0, 0),
        Coord::new(size - 1, size - 1),
        (2 * size * size) as Energy,
    );
    for row in (1..size).step_by(2) {
        let gap = if row % 4 == 1 { size - 1 } else { 0 };
        for col in (0..size).filter(|c| *c != gap) {
            s.black_holes.push(Coord::new(row, col));
        }
    }
    Universe::from_scenario(&s).expect("valid scenario")
}

/// Destination sealed off, so the whole reachable space is explored.
fn sealed(size: i32) -> Universe {
    let mut s = Scenario::uniform(
        size,
        size,
        1,
        Coord::new(0, 0),
        Coord::new(size - 1, size - 1),
        (size * size) as Energy,
    );
    s.black_holes.push(Coord::new(size - 2, size - 1));
    s.black_holes.push(Coord::new(size - 1, size - 2));
    Universe::from_scenario(&s).expect("valid scenario")
}

fn bench(label: &str, universe: &Universe, iterations: usize) {
    let start = Instant::now();
    let mut calls = 0;
    for _ in 0..iterations {
        let mut explorer = Explorer::new(black_box(universe), SearchConfig::default());
        let _ = black_box(explorer.find_path());
        calls = explorer.stats().calls;
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  {label} ({calls} calls, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Search Benchmarks ===\n");

    println!("Open grid:");
    for size in [8, 32, 64] {
        bench(&format!("{size}x{size}"), &open_grid(size), 100);
    }

    println!("\nSerpentine walls:");
    for size in [9, 17, 33] {
        bench(&format!("{size}x{size}"), &serpentine(size), 100);
    }

    println!("\nSealed destination (exhaustive):");
    for size in [6, 8, 10] {
        bench(&format!("{size}x{size}"), &sealed(size), 10);
    }

    println!("\n=== Done ===");
}
