//! All-pairs shortest paths (Floyd–Warshall) with next-hop pointers.
//!
//! Built once per map version from the [`NeighborGraph`]; afterwards any
//! query is answered in O(path length) without searching. Construction is
//! O(n³) in the number of cells and stores two n × n tables, so it is only
//! practical for small maps.

use gridpath_core::{Point, Range};

use crate::neighbors::NeighborGraph;

const NO_HOP: u32 = u32::MAX;

/// Shortest distances and next hops between every pair of cells.
///
/// Immutable once built: share it freely between readers and rebuild it
/// (through `&mut` access) after the neighbor graph changes.
#[derive(Debug, Clone)]
pub struct AllPairsTable {
    rng: Range,
    n: usize,
    /// `distance[i * n + j]`, infinite when unreachable.
    distance: Vec<f32>,
    /// `next[i * n + j]`: first cell after `i` on the best path to `j`.
    next: Vec<u32>,
}

impl AllPairsTable {
    /// Compute the table for `graph`, charging `diagonal_cost` per diagonal
    /// step and 1 per orthogonal step.
    pub fn build(graph: &NeighborGraph, diagonal_cost: f32) -> Self {
        let rng = graph.range();
        let n = graph.len();
        let mut distance = vec![f32::INFINITY; n * n];
        let mut next = vec![NO_HOP; n * n];

        for i in 0..n {
            if graph.wall_at(i) {
                continue;
            }
            distance[i * n + i] = 0.0;
            next[i * n + i] = i as u32;
            let p = rng.point(i);
            for d in graph.mask_at(i).iter() {
                let Some(j) = rng.index(p + d.offset()) else {
                    continue;
                };
                distance[i * n + j] = if d.is_diagonal() { diagonal_cost } else { 1.0 };
                next[i * n + j] = j as u32;
            }
        }

        for k in 0..n {
            if graph.wall_at(k) {
                continue;
            }
            for i in 0..n {
                let dik = distance[i * n + k];
                if dik == f32::INFINITY || i == k {
                    continue;
                }
                let hop = next[i * n + k];
                for j in 0..n {
                    let through = dik + distance[k * n + j];
                    if through < distance[i * n + j] {
                        distance[i * n + j] = through;
                        next[i * n + j] = hop;
                    }
                }
            }
        }

        log::debug!("all-pairs table built over {n} cells");
        Self {
            rng,
            n,
            distance,
            next,
        }
    }

    /// The cells covered by the table.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Shortest distance from `a` to `b`, or `None` if unreachable or off
    /// the map.
    pub fn distance(&self, a: Point, b: Point) -> Option<f32> {
        let i = self.rng.index(a)?;
        let j = self.rng.index(b)?;
        let d = self.distance[i * self.n + j];
        d.is_finite().then_some(d)
    }

    /// Shortest path from `a` to `b` inclusive, or `None` if none exists.
    pub fn query(&self, a: Point, b: Point) -> Option<Vec<Point>> {
        let i = self.rng.index(a)?;
        let j = self.rng.index(b)?;
        if !self.distance[i * self.n + j].is_finite() {
            return None;
        }
        let mut path = vec![a];
        let mut cur = i;
        while cur != j {
            let hop = self.next[cur * self.n + j];
            if hop == NO_HOP {
                return None;
            }
            cur = hop as usize;
            path.push(self.rng.point(cur));
        }
        Some(path)
    }
}
