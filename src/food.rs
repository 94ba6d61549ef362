use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::grid::{PlayArea, Position};

/// Random picks tried before falling back to a full scan.
const MAX_SAMPLE_ATTEMPTS: usize = 32;

/// Picks a free cell for the next piece of food.
///
/// While at least half of the area is free, a handful of uniform random picks
/// almost always lands on a free cell. On crowded boards (or after the picks
/// run out) the free cells are enumerated and one is chosen uniformly, so
/// spawning always terminates and a full board yields `None`.
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    rng: StdRng,
}

impl FoodSpawner {
    pub fn new() -> Self {
        FoodSpawner { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        FoodSpawner { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn spawn(&mut self, occupied: &HashSet<Position>, area: &PlayArea) -> Option<Position> {
        let total = area.cell_count();
        let taken = occupied.iter().filter(|pos| area.contains(**pos)).count();
        let free = total - taken;

        if free == 0 {
            return None;
        }

        if free * 2 >= total {
            for _ in 0..MAX_SAMPLE_ATTEMPTS {
                let pos = area.cell_at(self.rng.gen_range(0..total));
                if !occupied.contains(&pos) {
                    return Some(pos);
                }
            }
        }

        let choices: Vec<Position> = area.cells().filter(|pos| !occupied.contains(pos)).collect();
        choices.choose(&mut self.rng).copied()
    }
}

impl Default for FoodSpawner {
    fn default() -> Self {
        Self::new()
    }
}
