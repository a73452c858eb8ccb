use gridpath_core::{Point, Range};

use crate::traits::Terrain;

/// One of the eight grid directions.
///
/// The discriminant is the bit used for the direction in a [`DirMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Dir {
    SouthWest = 0,
    West = 1,
    NorthWest = 2,
    North = 3,
    NorthEast = 4,
    East = 5,
    SouthEast = 6,
    South = 7,
}

impl Dir {
    /// All directions, in bit order.
    pub const ALL: [Dir; 8] = [
        Dir::SouthWest,
        Dir::West,
        Dir::NorthWest,
        Dir::North,
        Dir::NorthEast,
        Dir::East,
        Dir::SouthEast,
        Dir::South,
    ];

    /// `(dx, dy)` offset of the direction. North is `-y`.
    #[inline]
    pub const fn offset(self) -> Point {
        match self {
            Dir::SouthWest => Point::new(-1, 1),
            Dir::West => Point::new(-1, 0),
            Dir::NorthWest => Point::new(-1, -1),
            Dir::North => Point::new(0, -1),
            Dir::NorthEast => Point::new(1, -1),
            Dir::East => Point::new(1, 0),
            Dir::SouthEast => Point::new(1, 1),
            Dir::South => Point::new(0, 1),
        }
    }

    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        let o = self.offset();
        o.x != 0 && o.y != 0
    }
}

/// Set of traversable directions out of one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirMask(pub u8);

impl DirMask {
    pub const EMPTY: DirMask = DirMask(0);

    #[inline]
    pub fn contains(self, d: Dir) -> bool {
        self.0 & d.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, d: Dir) {
        self.0 |= d.bit();
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Directions in the mask, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Dir> {
        Dir::ALL.into_iter().filter(move |&d| self.contains(d))
    }
}

/// Per-cell traversability snapshot of a map.
///
/// A neighbor is reachable when it is on the map and not a wall, and, for a
/// diagonal step, neither of the two orthogonal cells around the corner is a
/// wall. Rebuild it after every map change, before any table built on it.
#[derive(Debug, Clone, Default)]
pub struct NeighborGraph {
    rng: Range,
    masks: Vec<DirMask>,
    walls: Vec<bool>,
}

impl NeighborGraph {
    /// Scan `map` and compute every cell's mask. Cells of the range that
    /// `map` does not report as valid are stored as walls.
    pub fn build<T: Terrain + ?Sized>(map: &T) -> Self {
        let rng = map.range();
        let blocked = |p: Point| !rng.contains(p) || !map.is_valid(p) || map.is_wall(p);

        let walls: Vec<bool> = rng.iter().map(|p| !map.is_valid(p) || map.is_wall(p)).collect();
        let masks = rng
            .iter()
            .map(|p| {
                let mut mask = DirMask::EMPTY;
                for d in Dir::ALL {
                    let o = d.offset();
                    if blocked(p + o) {
                        continue;
                    }
                    if d.is_diagonal() && (blocked(p.shift(o.x, 0)) || blocked(p.shift(0, o.y))) {
                        continue;
                    }
                    mask.insert(d);
                }
                mask
            })
            .collect();

        let graph = Self { rng, masks, walls };
        log::debug!(
            "neighbor graph rebuilt: {} cells, {} walkable",
            graph.len(),
            graph.walkable_count()
        );
        graph
    }

    /// The cells covered by the graph.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Number of cells (walls included).
    #[inline]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.rng.contains(p)
    }

    /// Linear cell id of `p`.
    #[inline]
    pub fn index(&self, p: Point) -> Option<usize> {
        self.rng.index(p)
    }

    /// Cell of linear id `idx`.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        self.rng.point(idx)
    }

    /// Whether `p` was a wall when the graph was built. Off-map is a wall.
    #[inline]
    pub fn is_wall(&self, p: Point) -> bool {
        self.index(p).is_none_or(|i| self.walls[i])
    }

    /// Traversable directions out of `p` (empty off the map).
    #[inline]
    pub fn mask(&self, p: Point) -> DirMask {
        self.index(p).map_or(DirMask::EMPTY, |i| self.masks[i])
    }

    #[inline]
    pub(crate) fn mask_at(&self, idx: usize) -> DirMask {
        self.masks[idx]
    }

    #[inline]
    pub(crate) fn wall_at(&self, idx: usize) -> bool {
        self.walls[idx]
    }

    /// Reachable neighbors of `p` with the direction used to reach them.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = (Point, Dir)> {
        self.mask(p).iter().map(move |d| (p + d.offset(), d))
    }

    /// Number of non-wall cells.
    pub fn walkable_count(&self) -> usize {
        self.walls.iter().filter(|&&w| !w).count()
    }

    /// Whether any wall lies in the box spanned by `a` and `b` (inclusive).
    pub fn box_has_wall(&self, a: Point, b: Point) -> bool {
        Range::spanning(a, b).iter().any(|p| self.is_wall(p))
    }
}
