//! A wall/floor grid with a mapping to world space.
//!
//! [`TileMap`] is the reference terrain for the path engine: it implements
//! [`Terrain`] and [`WorldMap`], placing cell `(x, y)` at
//! `origin + (x + 0.5, y + 0.5) × cell_size`.

use std::fmt;

use gridpath_core::{Point, Range, WorldPos};
use gridpath_paths::{Terrain, WorldMap};

/// Contents of one map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    #[default]
    Floor,
    Wall,
}

impl Tile {
    /// Character used for the tile in ASCII maps.
    pub const fn glyph(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
        }
    }
}

/// A rectangular grid of [`Tile`]s placed in world space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    bounds: Range,
    tiles: Vec<Tile>,
    origin: WorldPos,
    cell_size: f32,
}

impl TileMap {
    /// Create an all-floor map with unit cells and the origin at zero.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::with_size(width.max(0), height.max(0));
        Self {
            bounds,
            tiles: vec![Tile::Floor; bounds.len()],
            origin: WorldPos::new(0.0, 0.0),
            cell_size: 1.0,
        }
    }

    /// Place the map in world space: the top-left corner of cell (0, 0)
    /// sits at `origin`, and each cell is `cell_size` wide.
    pub fn with_world(mut self, origin: WorldPos, cell_size: f32) -> Self {
        self.origin = origin;
        self.cell_size = cell_size;
        self
    }

    /// Returns the bounding range of the map.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn origin(&self) -> WorldPos {
        self.origin
    }

    /// Get the tile at a point, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<Tile> {
        self.bounds.index(p).map(|i| self.tiles[i])
    }

    /// Set the tile at a point. Returns whether `p` was on the map.
    pub fn set(&mut self, p: Point, tile: Tile) -> bool {
        match self.bounds.index(p) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Fill the whole map with `tile`.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Count how many cells hold `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Iterate over `(Point, Tile)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.bounds.iter().zip(self.tiles.iter().copied())
    }

    /// All floor cells, in row-major order.
    pub fn floors(&self) -> Vec<Point> {
        self.iter()
            .filter(|&(_, t)| t == Tile::Floor)
            .map(|(p, _)| p)
            .collect()
    }

    pub(crate) fn from_tiles(bounds: Range, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(bounds.len(), tiles.len());
        Self {
            bounds,
            tiles,
            origin: WorldPos::new(0.0, 0.0),
            cell_size: 1.0,
        }
    }
}

impl Terrain for TileMap {
    fn range(&self) -> Range {
        self.bounds
    }

    fn is_wall(&self, p: Point) -> bool {
        self.at(p) != Some(Tile::Floor)
    }
}

impl WorldMap for TileMap {
    fn to_world(&self, p: Point) -> WorldPos {
        WorldPos::new(
            self.origin.x + (p.x as f32 + 0.5) * self.cell_size,
            self.origin.y + (p.y as f32 + 0.5) * self.cell_size,
        )
    }

    fn to_cell(&self, w: WorldPos) -> Point {
        Point::new(
            ((w.x - self.origin.x) / self.cell_size).floor() as i32,
            ((w.y - self.origin.y) / self.cell_size).floor() as i32,
        )
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

/// Renders the map as ASCII art, one line per row.
impl fmt::Display for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.width().max(1) as usize;
        for (i, row) in self.tiles.chunks(w).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for t in row {
                write!(f, "{}", t.glyph())?;
            }
        }
        Ok(())
    }
}
