//! Reference terrain for gridpath: a wall/floor [`TileMap`] placed in world
//! space, ASCII map parsing, and seeded random map generation.

pub mod mapgen;
pub mod parse;
pub mod tilemap;

pub use mapgen::{CellularAutomataRule, MapGen};
pub use parse::{MapError, ParsedMap, parse_map};
pub use tilemap::{Tile, TileMap};
