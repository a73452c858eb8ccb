use gridpath_core::{Point, Range, WorldPos};

/// Minimal map interface: bounds and wall lookup.
pub trait Terrain {
    /// The cells covered by the map.
    fn range(&self) -> Range;

    /// Whether `p` blocks movement. Positions outside the map should report
    /// `true`.
    fn is_wall(&self, p: Point) -> bool;

    /// Whether `p` is a position on the map. Cells of [`range`](Self::range)
    /// for which this is false are treated as walls.
    fn is_valid(&self, p: Point) -> bool {
        self.range().contains(p)
    }
}

/// Terrain with a mapping between cells and world positions.
pub trait WorldMap: Terrain {
    /// World position of the center of cell `p`.
    fn to_world(&self, p: Point) -> WorldPos;

    /// Cell containing world position `w`. May lie outside the map.
    fn to_cell(&self, w: WorldPos) -> Point;

    /// World-space distance between the centers of two orthogonally
    /// adjacent cells.
    fn cell_size(&self) -> f32 {
        self.to_world(Point::new(1, 0))
            .distance(self.to_world(Point::ZERO))
    }
}

/// Visual state reported to a [`ColorSink`] while a search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugColor {
    /// The cell is on the open list.
    Open,
    /// The cell has been expanded.
    Closed,
}

/// Receiver for per-cell debug colors. Purely observational.
pub trait ColorSink {
    fn set_color(&mut self, p: Point, color: DebugColor);
}

/// A [`ColorSink`] that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoColors;

impl ColorSink for NoColors {
    #[inline]
    fn set_color(&mut self, _p: Point, _color: DebugColor) {}
}

impl<F: FnMut(Point, DebugColor)> ColorSink for F {
    #[inline]
    fn set_color(&mut self, p: Point, color: DebugColor) {
        self(p, color)
    }
}
