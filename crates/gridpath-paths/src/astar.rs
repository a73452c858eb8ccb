//! Resumable A* search over a [`NeighborGraph`].
//!
//! [`AStarSearch`] keeps its whole state between calls so a search can be
//! spread across frames: [`new_request`](AStarSearch::new_request) resets it,
//! each [`step`](AStarSearch::step) expands exactly one node, and
//! [`run`](AStarSearch::run) steps until the search ends. Starting a new
//! request at any point discards the one in progress.

use gridpath_core::{Point, Range};

use crate::bucket::BucketQueue;
use crate::config::SearchConfig;
use crate::error::{InvalidReason, PathError};
use crate::heuristic::Heuristic;
use crate::neighbors::NeighborGraph;
use crate::traits::{ColorSink, DebugColor};

/// Progress of a node within the current search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeStatus {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// Progress of the search as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchState {
    /// No request has been made, or the last one failed.
    #[default]
    Idle,
    /// The goal has not been reached yet; call `step` again.
    Processing,
    /// A path was found.
    Complete,
    /// The open list ran dry: no path exists.
    Impossible,
}

impl SearchState {
    /// Whether the search has finished, successfully or not.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Impossible)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    g: f32,
    f: f32,
    status: NodeStatus,
    parent: Option<usize>,
}

/// Search context for one A* query at a time.
///
/// Not shared between searches; run concurrent searches with separate
/// instances.
#[derive(Debug, Clone)]
pub struct AStarSearch {
    rng: Range,
    nodes: Vec<Node>,
    open: BucketQueue<usize>,
    state: SearchState,
    start: usize,
    goal: usize,
    goal_pos: Point,
    heuristic: Heuristic,
    weight: f32,
    diagonal_cost: f32,
    expanded: usize,
    path: Vec<Point>,
}

impl AStarSearch {
    /// Create an idle search. Node storage is sized on the first request.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            rng: Range::default(),
            nodes: Vec::new(),
            open: BucketQueue::from_config(config),
            state: SearchState::Idle,
            start: 0,
            goal: 0,
            goal_pos: Point::ZERO,
            heuristic: Heuristic::default(),
            weight: 1.0,
            diagonal_cost: config.diagonal_cost,
            expanded: 0,
            path: Vec::new(),
        }
    }

    /// Start a new search from `start` to `goal`, discarding any search in
    /// progress.
    ///
    /// Fails with [`PathError::InvalidRequest`] if either cell is off the
    /// graph or a wall, or if `weight` is not a finite non-negative number;
    /// the current search is then left untouched.
    pub fn new_request<C: ColorSink + ?Sized>(
        &mut self,
        graph: &NeighborGraph,
        start: Point,
        goal: Point,
        heuristic: Heuristic,
        weight: f32,
        colors: &mut C,
    ) -> Result<(), PathError> {
        let start_idx = endpoint(graph, start)?;
        let goal_idx = endpoint(graph, goal)?;
        if !weight.is_finite() || weight < 0.0 {
            log::warn!("rejected request {start} -> {goal}: heuristic weight {weight}");
            return Err(PathError::InvalidRequest {
                pos: start,
                reason: InvalidReason::Weight,
            });
        }

        if self.rng != graph.range() || self.nodes.len() != graph.len() {
            self.rng = graph.range();
            self.nodes.clear();
            self.nodes.resize(graph.len(), Node::default());
        } else {
            self.nodes.fill(Node::default());
        }
        self.open.clear();
        self.path.clear();
        self.expanded = 0;
        self.start = start_idx;
        self.goal = goal_idx;
        self.goal_pos = goal;
        self.heuristic = heuristic;
        self.weight = weight;

        let f = heuristic.estimate(start, goal) * weight;
        self.nodes[start_idx] = Node {
            g: 0.0,
            f,
            status: NodeStatus::Open,
            parent: None,
        };
        if let Err(e) = self.open.insert(start_idx, f) {
            return Err(self.abort(e));
        }
        colors.set_color(start, DebugColor::Open);
        self.state = SearchState::Processing;
        log::debug!("new search {start} -> {goal} ({heuristic:?}, weight {weight})");
        Ok(())
    }

    /// Expand exactly one node.
    ///
    /// Outside of [`SearchState::Processing`] this does nothing and returns
    /// the current state.
    pub fn step<C: ColorSink + ?Sized>(
        &mut self,
        graph: &NeighborGraph,
        colors: &mut C,
    ) -> Result<SearchState, PathError> {
        if self.state != SearchState::Processing {
            return Ok(self.state);
        }
        if graph.range() != self.rng {
            log::warn!("map changed during a search; dropping it");
            self.state = SearchState::Idle;
            return Err(PathError::StaleCall);
        }

        let Some((ci, _)) = self.open.extract_min() else {
            return Ok(self.finish_impossible());
        };
        self.expanded += 1;

        if ci == self.goal {
            self.reconstruct();
            self.state = SearchState::Complete;
            log::debug!(
                "search complete: cost {:.2}, {} cells, {} expansions",
                self.nodes[ci].g,
                self.path.len(),
                self.expanded
            );
            return Ok(self.state);
        }

        let cp = self.rng.point(ci);
        let cg = self.nodes[ci].g;
        self.nodes[ci].status = NodeStatus::Closed;
        colors.set_color(cp, DebugColor::Closed);
        log::trace!("expand {cp} g={cg:.2}");

        for d in graph.mask_at(ci).iter() {
            let np = cp + d.offset();
            let Some(ni) = self.rng.index(np) else {
                continue;
            };
            let step = if d.is_diagonal() { self.diagonal_cost } else { 1.0 };
            let g = cg + step;
            let f = g + self.heuristic.estimate(np, self.goal_pos) * self.weight;

            let node = self.nodes[ni];
            let inserted = match node.status {
                NodeStatus::Unvisited => self.open.insert(ni, f).map(|()| true),
                NodeStatus::Open if f < node.f => self.open.decrease_key(ni, node.f, f),
                _ => Ok(false),
            };
            match inserted {
                Ok(true) => {
                    self.nodes[ni] = Node {
                        g,
                        f,
                        status: NodeStatus::Open,
                        parent: Some(ci),
                    };
                    colors.set_color(np, DebugColor::Open);
                }
                Ok(false) => {}
                Err(e) => return Err(self.abort(e)),
            }
        }

        if self.open.is_empty() {
            return Ok(self.finish_impossible());
        }
        Ok(SearchState::Processing)
    }

    /// Step until the search completes or proves impossible.
    pub fn run<C: ColorSink + ?Sized>(
        &mut self,
        graph: &NeighborGraph,
        colors: &mut C,
    ) -> Result<SearchState, PathError> {
        loop {
            match self.step(graph, colors)? {
                SearchState::Processing => continue,
                state => return Ok(state),
            }
        }
    }

    /// Current state of the search.
    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Cells of the found path, start to goal. Empty unless complete.
    #[inline]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Given-cost of the goal once the search is complete.
    pub fn goal_cost(&self) -> Option<f32> {
        (self.state == SearchState::Complete).then(|| self.nodes[self.goal].g)
    }

    /// Number of nodes extracted from the open list so far.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Status of `p` in the current search.
    pub fn node_status(&self, p: Point) -> Option<NodeStatus> {
        self.rng
            .index(p)
            .and_then(|i| self.nodes.get(i))
            .map(|n| n.status)
    }

    /// Given-cost of `p` if it has been reached.
    pub fn given_cost(&self, p: Point) -> Option<f32> {
        let i = self.rng.index(p)?;
        let n = self.nodes.get(i)?;
        (n.status != NodeStatus::Unvisited).then_some(n.g)
    }

    /// Drop the search in progress, if any, and return to
    /// [`SearchState::Idle`]. The last path is kept until the next request.
    pub fn cancel(&mut self) {
        if self.state == SearchState::Processing {
            log::debug!("search cancelled after {} expansions", self.expanded);
        }
        self.open.clear();
        self.state = SearchState::Idle;
    }

    fn finish_impossible(&mut self) -> SearchState {
        self.state = SearchState::Impossible;
        log::debug!(
            "search impossible: {} -> {} after {} expansions",
            self.rng.point(self.start),
            self.goal_pos,
            self.expanded
        );
        self.state
    }

    fn abort(&mut self, e: PathError) -> PathError {
        self.state = SearchState::Idle;
        self.open.clear();
        e
    }

    fn reconstruct(&mut self) {
        self.path.clear();
        let mut cur = Some(self.goal);
        while let Some(i) = cur {
            self.path.push(self.rng.point(i));
            cur = self.nodes[i].parent;
        }
        self.path.reverse();
    }
}

/// Linear id of a request endpoint, or why it cannot be used.
pub(crate) fn endpoint(graph: &NeighborGraph, p: Point) -> Result<usize, PathError> {
    let Some(i) = graph.index(p) else {
        log::warn!("rejected request endpoint {p}: off the map");
        return Err(PathError::InvalidRequest {
            pos: p,
            reason: InvalidReason::OutOfBounds,
        });
    };
    if graph.wall_at(i) {
        log::warn!("rejected request endpoint {p}: wall");
        return Err(PathError::InvalidRequest {
            pos: p,
            reason: InvalidReason::Wall,
        });
    }
    Ok(i)
}
