use gridpath_core::WorldPos;

use crate::heuristic::Heuristic;

/// How a path is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// Live A* search, possibly spread over several calls.
    #[default]
    AStar,
    /// Lookup in the precomputed all-pairs table.
    FloydWarshall,
}

/// Per-request options.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathSettings {
    pub heuristic: Heuristic,
    /// Multiplier applied to the heuristic. Values above 1 trade optimality
    /// for fewer expansions.
    pub weight: f32,
    pub method: Method,
    /// Expand one node per call instead of running to completion.
    pub single_step: bool,
    /// Drop waypoints that a straight move can skip.
    pub rubber_banding: bool,
    /// Insert Catmull-Rom points between waypoints.
    pub smoothing: bool,
    /// Report open and closed cells to the color sink.
    pub debug_coloring: bool,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::default(),
            weight: 1.0,
            method: Method::default(),
            single_step: false,
            rubber_banding: false,
            smoothing: false,
            debug_coloring: false,
        }
    }
}

/// A path query and, once complete, its answer.
///
/// Set `new_request` to start over; leave it unset to continue a
/// single-step search. The planner clears the flag once it has accepted the
/// request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathRequest {
    pub start: WorldPos,
    pub goal: WorldPos,
    pub settings: PathSettings,
    pub new_request: bool,
    /// Waypoints from start to goal. Empty until the search completes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub path: Vec<WorldPos>,
}

impl PathRequest {
    /// A fresh request between two world positions.
    pub fn new(start: WorldPos, goal: WorldPos, settings: PathSettings) -> Self {
        Self {
            start,
            goal,
            settings,
            new_request: true,
            path: Vec::new(),
        }
    }
}

/// Outcome of one [`compute_path`](crate::PathPlanner::compute_path) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathResult {
    /// The search needs more calls.
    Processing,
    /// `path` holds the answer.
    Complete,
    /// No path connects start and goal.
    Impossible,
}
