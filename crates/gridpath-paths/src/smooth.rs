//! Path post-processing: rubber banding and Catmull-Rom smoothing.

use gridpath_core::{Point, WorldPos};

use crate::neighbors::NeighborGraph;

/// Parameters at which points are inserted between two waypoints.
const SPLINE_STEPS: [f32; 3] = [0.25, 0.5, 0.75];

/// Drop waypoints that a straight move can skip.
///
/// Walks back from the goal. While the box spanned by the current anchor
/// and the waypoint two steps back holds no wall, the waypoint in between is
/// bypassed; otherwise it is kept and becomes the new anchor. The first and
/// last waypoints are always kept.
pub fn rubber_band(cells: &[Point], graph: &NeighborGraph) -> Vec<Point> {
    if cells.len() <= 2 {
        return cells.to_vec();
    }
    let mut out = Vec::with_capacity(cells.len());
    let mut anchor = cells[cells.len() - 1];
    out.push(anchor);

    // `mid` is the waypoint right before the anchor in the current chain.
    let mut mid = cells.len() - 2;
    while mid > 0 {
        let before = cells[mid - 1];
        if graph.box_has_wall(anchor, before) {
            anchor = cells[mid];
            out.push(anchor);
        }
        mid -= 1;
    }
    out.push(cells[0]);
    out.reverse();
    out
}

/// Insert midpoints until no segment is longer than `max_len`.
pub fn subdivide(points: &[WorldPos], max_len: f32) -> Vec<WorldPos> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    if max_len.is_nan() || max_len <= 0.0 {
        return points.to_vec();
    }
    let mut out = vec![first];
    let mut prev = first;
    for &p in rest {
        let len = prev.distance(p);
        // Halving until short enough yields 2^k equal pieces.
        let mut pieces = 1u32;
        while len / pieces as f32 > max_len {
            pieces *= 2;
        }
        for i in 1..pieces {
            let t = i as f32 / pieces as f32;
            out.push(prev + (p - prev) * t);
        }
        out.push(p);
        prev = p;
    }
    out
}

/// Insert three Catmull-Rom points (t = 0.25, 0.5, 0.75) into every segment.
///
/// The first and last waypoints stand in for the missing outer control
/// points, so both endpoints are kept exactly. Paths with fewer than two
/// points are returned as is.
pub fn catmull_rom(points: &[WorldPos]) -> Vec<WorldPos> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(n + (n - 1) * SPLINE_STEPS.len());
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];
        out.push(p1);
        out.extend(
            SPLINE_STEPS
                .iter()
                .map(|&t| WorldPos::catmull_rom(p0, p1, p2, p3, t)),
        );
    }
    out.push(points[n - 1]);
    out
}
