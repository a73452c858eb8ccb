//! Random map generation.
//!
//! Two generators fill a [`TileMap`]:
//! - **Scatter**: each cell independently becomes a wall with a given
//!   probability. Good for stress-testing searches.
//! - **Cellular automata cave**: scatter, then smooth with cellular automata
//!   rules into cave-like open areas.
//!
//! Generators take the random source as a parameter, so a seeded
//! `SmallRng` reproduces the same map.

use gridpath_core::Point;
use rand::{Rng, RngExt};

use crate::tilemap::{Tile, TileMap};

/// A rule for one iteration of cellular automata smoothing.
#[derive(Debug, Clone)]
pub struct CellularAutomataRule {
    /// If a cell has >= this many walls in its 1-ring (8 neighbors), it
    /// becomes a wall.
    pub w_cutoff1: i32,
    /// If a cell has <= this many walls in its 2-ring (24 neighbors), it
    /// becomes a wall.
    pub w_cutoff2: i32,
    /// Whether cells outside the map count as walls.
    pub walls_out_of_range: bool,
    /// How many times to apply this rule.
    pub reps: usize,
}

impl Default for CellularAutomataRule {
    fn default() -> Self {
        Self {
            w_cutoff1: 5,
            w_cutoff2: 2,
            walls_out_of_range: true,
            reps: 4,
        }
    }
}

/// Map generator operating on a [`TileMap`].
#[derive(Debug, Clone)]
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub map: TileMap,
}

impl<R: Rng> MapGen<R> {
    /// Create a generator over `map`.
    pub fn with_map(map: TileMap, rng: R) -> Self {
        Self { rng, map }
    }

    /// Turn every cell into a wall with probability `wall_pct` (0.0–1.0),
    /// into floor otherwise.
    ///
    /// Returns the number of floor cells.
    pub fn scatter(&mut self, wall_pct: f64) -> usize {
        for p in self.map.bounds() {
            let r: f64 = self.rng.random();
            self.map.set(p, if r < wall_pct { Tile::Wall } else { Tile::Floor });
        }
        let floors = self.map.count(Tile::Floor);
        log::debug!("scattered walls: {floors} floor cells");
        floors
    }

    /// Generate a cave: scatter walls with `wall_init_pct`, then apply each
    /// rule in `rules` for its number of repetitions.
    ///
    /// Returns the number of floor cells in the final map.
    pub fn cellular_automata_cave(
        &mut self,
        wall_init_pct: f64,
        rules: &[CellularAutomataRule],
    ) -> usize {
        self.scatter(wall_init_pct);
        let bounds = self.map.bounds();
        let mut scratch = vec![Tile::Floor; bounds.len()];

        for rule in rules {
            for _ in 0..rule.reps {
                for (i, p) in bounds.iter().enumerate() {
                    let walls1 = self.count_walls_ring(p, 1, rule.walls_out_of_range);
                    let walls2 = self.count_walls_ring(p, 2, rule.walls_out_of_range);
                    scratch[i] = if walls1 >= rule.w_cutoff1 || walls2 <= rule.w_cutoff2 {
                        Tile::Wall
                    } else {
                        Tile::Floor
                    };
                }
                for (p, &t) in bounds.iter().zip(&scratch) {
                    self.map.set(p, t);
                }
            }
        }

        let floors = self.map.count(Tile::Floor);
        log::debug!("cave generated: {floors} floor cells");
        floors
    }

    /// A uniformly chosen floor cell, or `None` if the map has none.
    pub fn random_floor(&mut self) -> Option<Point> {
        let floors = self.map.floors();
        if floors.is_empty() {
            return None;
        }
        Some(floors[self.rng.random_range(0..floors.len())])
    }

    /// Count wall cells within Chebyshev distance `radius` of `center`.
    fn count_walls_ring(&self, center: Point, radius: i32, walls_out_of_range: bool) -> i32 {
        let mut count = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                match self.map.at(center.shift(dx, dy)) {
                    Some(Tile::Wall) => count += 1,
                    Some(Tile::Floor) => {}
                    None if walls_out_of_range => count += 1,
                    None => {}
                }
            }
        }
        count
    }
}
