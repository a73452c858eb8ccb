use gridpath_core::Point;

/// Octile weight of the shorter axis, 1.41 − 1.
const OCTILE_DIAGONAL: f32 = 0.41;

/// Remaining-cost estimate used by the A* search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// `dx + dy`. Overestimates once diagonal steps are allowed.
    Manhattan,
    /// `max(dx, dy)`.
    Chebyshev,
    /// `sqrt(dx² + dy²)`.
    Euclidean,
    /// `0.41 · min(dx, dy) + max(dx, dy)`; exact on an open grid.
    #[default]
    Octile,
    /// Euclidean on cells where `row + col` is odd, zero elsewhere.
    ///
    /// Deliberately inconsistent, for showing how the search degrades.
    Inconsistent,
}

impl Heuristic {
    /// All heuristics, in declaration order.
    pub const ALL: [Heuristic; 5] = [
        Self::Manhattan,
        Self::Chebyshev,
        Self::Euclidean,
        Self::Octile,
        Self::Inconsistent,
    ];

    /// Estimated cost from `from` to `goal`.
    pub fn estimate(self, from: Point, goal: Point) -> f32 {
        let (dx, dy) = from.abs_diff(goal);
        let (dx, dy) = (dx as f32, dy as f32);
        match self {
            Self::Manhattan => manhattan(dx, dy),
            Self::Chebyshev => chebyshev(dx, dy),
            Self::Euclidean => euclidean(dx, dy),
            Self::Octile => octile(dx, dy),
            // Parity of the evaluated cell, not of the goal.
            Self::Inconsistent => {
                if (from.row() + from.col()).rem_euclid(2) == 1 {
                    euclidean(dx, dy)
                } else {
                    0.0
                }
            }
        }
    }

    /// Parse a heuristic from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "manhattan" => Some(Self::Manhattan),
            "chebyshev" => Some(Self::Chebyshev),
            "euclidean" => Some(Self::Euclidean),
            "octile" => Some(Self::Octile),
            "inconsistent" => Some(Self::Inconsistent),
            _ => None,
        }
    }
}

#[inline]
fn manhattan(dx: f32, dy: f32) -> f32 {
    dx + dy
}

#[inline]
fn chebyshev(dx: f32, dy: f32) -> f32 {
    dx.max(dy)
}

#[inline]
fn euclidean(dx: f32, dy: f32) -> f32 {
    (dx * dx + dy * dy).sqrt()
}

#[inline]
fn octile(dx: f32, dy: f32) -> f32 {
    dx.min(dy) * OCTILE_DIAGONAL + dx.max(dy)
}
