use gridpath_core::{Point, WorldPos};

use crate::astar::{self, AStarSearch, SearchState};
use crate::config::SearchConfig;
use crate::error::PathError;
use crate::floyd::AllPairsTable;
use crate::neighbors::NeighborGraph;
use crate::request::{Method, PathRequest, PathResult, PathSettings};
use crate::smooth;
use crate::traits::{ColorSink, DebugColor, Terrain, WorldMap};

/// Longest segment, in cells, handed to the spline when rubber banding is
/// also on.
const MAX_SPLINE_SEGMENT: f32 = 1.5;

/// Entry point of the engine: owns the neighbor graph, the live search and
/// the optional all-pairs table, and answers [`PathRequest`]s.
///
/// Call [`map_changed`](Self::map_changed) whenever the terrain changes,
/// then [`compute_path`](Self::compute_path) once per request, or once per
/// frame for single-step requests.
#[derive(Debug, Clone)]
pub struct PathPlanner {
    config: SearchConfig,
    graph: NeighborGraph,
    search: AStarSearch,
    table: Option<AllPairsTable>,
}

impl PathPlanner {
    /// A planner with no map yet.
    pub fn new(config: SearchConfig) -> Self {
        let search = AStarSearch::new(&config);
        Self {
            config,
            graph: NeighborGraph::default(),
            search,
            table: None,
        }
    }

    /// A planner ready to answer requests on `map`.
    pub fn with_map<T: Terrain + ?Sized>(map: &T, config: SearchConfig) -> Self {
        let mut planner = Self::new(config);
        planner.map_changed(map);
        planner
    }

    /// Rebuild the neighbor graph from `map`, then the all-pairs table when
    /// enabled. A search in progress is dropped.
    pub fn map_changed<T: Terrain + ?Sized>(&mut self, map: &T) {
        self.search.cancel();
        self.graph = NeighborGraph::build(map);
        self.table = self
            .config
            .precompute_all_pairs
            .then(|| AllPairsTable::build(&self.graph, self.config.diagonal_cost));
    }

    /// Serve `request` against `map`.
    ///
    /// With `request.new_request` set, the previous output is cleared and a
    /// new query starts; the flag is then reset so later calls continue it.
    /// Single-step A* requests return [`PathResult::Processing`] until the
    /// search ends. On [`PathResult::Complete`], `request.path` holds world
    /// waypoints from start to goal, post-processed as the settings ask.
    ///
    /// `map` must be the terrain last passed to
    /// [`map_changed`](Self::map_changed).
    pub fn compute_path<M, C>(
        &mut self,
        map: &M,
        request: &mut PathRequest,
        colors: &mut C,
    ) -> Result<PathResult, PathError>
    where
        M: WorldMap + ?Sized,
        C: ColorSink + ?Sized,
    {
        let settings = request.settings;
        let colors = &mut Gated {
            sink: colors,
            on: settings.debug_coloring,
        };

        if request.new_request {
            request.path.clear();
            let start = map.to_cell(request.start);
            let goal = map.to_cell(request.goal);
            match settings.method {
                Method::FloydWarshall => {
                    astar::endpoint(&self.graph, start)?;
                    astar::endpoint(&self.graph, goal)?;
                    let table = self.table.as_ref().ok_or(PathError::TableUnavailable)?;
                    self.search.cancel();
                    request.new_request = false;
                    return Ok(match table.query(start, goal) {
                        Some(cells) => {
                            log::debug!("table path {start} -> {goal}: {} cells", cells.len());
                            request.path = self.finish(map, cells, &settings);
                            PathResult::Complete
                        }
                        None => {
                            log::debug!("table path {start} -> {goal}: unreachable");
                            PathResult::Impossible
                        }
                    });
                }
                Method::AStar => {
                    self.search.new_request(
                        &self.graph,
                        start,
                        goal,
                        settings.heuristic,
                        settings.weight,
                        colors,
                    )?;
                    request.new_request = false;
                }
            }
        } else if self.search.state() != SearchState::Processing {
            log::warn!("continuation requested with no search in progress");
            return Err(PathError::StaleCall);
        }

        let state = if settings.single_step {
            self.search.step(&self.graph, colors)?
        } else {
            self.search.run(&self.graph, colors)?
        };
        Ok(match state {
            SearchState::Processing => PathResult::Processing,
            SearchState::Complete => {
                let cells = self.search.path().to_vec();
                request.path = self.finish(map, cells, &settings);
                PathResult::Complete
            }
            SearchState::Impossible => PathResult::Impossible,
            SearchState::Idle => return Err(PathError::StaleCall),
        })
    }

    /// Post-process a cell path into world waypoints.
    fn finish<M: WorldMap + ?Sized>(
        &self,
        map: &M,
        mut cells: Vec<Point>,
        settings: &PathSettings,
    ) -> Vec<WorldPos> {
        if settings.rubber_banding {
            cells = smooth::rubber_band(&cells, &self.graph);
        }
        let mut points: Vec<WorldPos> = cells.iter().map(|&p| map.to_world(p)).collect();
        if settings.smoothing {
            if settings.rubber_banding {
                points = smooth::subdivide(&points, MAX_SPLINE_SEGMENT * map.cell_size());
            }
            points = smooth::catmull_rom(&points);
        }
        points
    }

    /// The live A* search.
    #[inline]
    pub fn search(&self) -> &AStarSearch {
        &self.search
    }

    /// The neighbor graph of the last map.
    #[inline]
    pub fn graph(&self) -> &NeighborGraph {
        &self.graph
    }

    /// The all-pairs table, if it was built.
    #[inline]
    pub fn table(&self) -> Option<&AllPairsTable> {
        self.table.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Default for PathPlanner {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// Forwards colors only while debug coloring is on.
struct Gated<'a, C: ?Sized> {
    sink: &'a mut C,
    on: bool,
}

impl<C: ColorSink + ?Sized> ColorSink for Gated<'_, C> {
    #[inline]
    fn set_color(&mut self, p: Point, color: DebugColor) {
        if self.on {
            self.sink.set_color(p, color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::Heuristic;
    use crate::neighbors::tests::AsciiMap;
    use crate::traits::NoColors;
    use gridpath_core::Range;
    use rand::rngs::SmallRng;
    use rand::{RngExt, SeedableRng};

    impl WorldMap for AsciiMap {
        fn to_world(&self, p: Point) -> WorldPos {
            WorldPos::new(p.x as f32 + 0.5, p.y as f32 + 0.5)
        }

        fn to_cell(&self, w: WorldPos) -> Point {
            Point::new(w.x.floor() as i32, w.y.floor() as i32)
        }
    }

    fn center(p: Point) -> WorldPos {
        WorldPos::new(p.x as f32 + 0.5, p.y as f32 + 0.5)
    }

    fn request(start: Point, goal: Point, settings: PathSettings) -> PathRequest {
        PathRequest::new(center(start), center(goal), settings)
    }

    fn random_map(rng: &mut SmallRng, w: i32, h: i32) -> AsciiMap {
        let mut map = AsciiMap::open(w, h);
        for p in Range::with_size(w, h) {
            if rng.random_range(0..100u32) < 25 {
                map.set_wall(p, true);
            }
        }
        map
    }

    fn floors(map: &AsciiMap) -> Vec<Point> {
        map.rng.iter().filter(|&p| !map.is_wall(p)).collect()
    }

    #[test]
    fn center_wall_scenario() {
        let mut map = AsciiMap::open(5, 5);
        map.set_wall(Point::new(2, 2), true);
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let settings = PathSettings {
            heuristic: Heuristic::Manhattan,
            ..PathSettings::default()
        };
        let mut req = request(Point::new(0, 0), Point::new(4, 4), settings);
        let res = planner.compute_path(&map, &mut req, &mut NoColors).unwrap();
        assert_eq!(res, PathResult::Complete);
        assert!(!req.new_request);
        assert_eq!(req.path.first(), Some(&center(Point::new(0, 0))));
        assert_eq!(req.path.last(), Some(&center(Point::new(4, 4))));
        assert!(!req.path.contains(&center(Point::new(2, 2))));
        assert!(planner.search().goal_cost().unwrap() <= 8.0);
    }

    #[test]
    fn single_step_requests_progress_across_calls() {
        let map = AsciiMap::open(6, 4);
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let settings = PathSettings {
            single_step: true,
            ..PathSettings::default()
        };
        let mut req = request(Point::new(0, 0), Point::new(5, 3), settings);
        let mut calls = 0;
        loop {
            calls += 1;
            match planner.compute_path(&map, &mut req, &mut NoColors).unwrap() {
                PathResult::Processing => assert!(req.path.is_empty()),
                PathResult::Complete => break,
                PathResult::Impossible => panic!("open map"),
            }
        }
        assert!(calls > 1);
        assert_eq!(calls, planner.search().expanded());
        assert_eq!(req.path.last(), Some(&center(Point::new(5, 3))));
    }

    #[test]
    fn stale_call_is_rejected_without_side_effects() {
        let map = AsciiMap::open(4, 4);
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let mut req = request(Point::new(0, 0), Point::new(3, 3), PathSettings::default());
        req.new_request = false;
        req.path.push(WorldPos::new(9.0, 9.0));
        assert_eq!(
            planner.compute_path(&map, &mut req, &mut NoColors),
            Err(PathError::StaleCall)
        );
        assert_eq!(req.path, vec![WorldPos::new(9.0, 9.0)]);
        assert_eq!(planner.search().state(), SearchState::Idle);

        // A finished request cannot be continued either.
        req.new_request = true;
        planner.compute_path(&map, &mut req, &mut NoColors).unwrap();
        assert_eq!(
            planner.compute_path(&map, &mut req, &mut NoColors),
            Err(PathError::StaleCall)
        );
    }

    #[test]
    fn invalid_request_clears_path() {
        let map = AsciiMap::parse(
            "
            ..#
            ...
            ",
        );
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let mut req = request(Point::new(0, 0), Point::new(2, 0), PathSettings::default());
        req.path.push(WorldPos::new(1.0, 1.0));
        let err = planner.compute_path(&map, &mut req, &mut NoColors).unwrap_err();
        assert!(matches!(err, PathError::InvalidRequest { .. }));
        assert!(req.path.is_empty());

        let mut req = PathRequest::new(WorldPos::new(-3.0, 0.5), center(Point::new(1, 1)), PathSettings::default());
        assert!(matches!(
            planner.compute_path(&map, &mut req, &mut NoColors),
            Err(PathError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn table_requests() {
        let map = AsciiMap::parse(
            "
            ....
            .##.
            ....
            ",
        );
        let settings = PathSettings {
            method: Method::FloydWarshall,
            ..PathSettings::default()
        };

        let mut no_table = PathPlanner::with_map(
            &map,
            SearchConfig {
                precompute_all_pairs: false,
                ..SearchConfig::default()
            },
        );
        assert!(no_table.table().is_none());
        let mut req = request(Point::new(0, 0), Point::new(3, 2), settings);
        assert_eq!(
            no_table.compute_path(&map, &mut req, &mut NoColors),
            Err(PathError::TableUnavailable)
        );

        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let mut req = request(Point::new(0, 0), Point::new(3, 2), settings);
        assert_eq!(
            planner.compute_path(&map, &mut req, &mut NoColors).unwrap(),
            PathResult::Complete
        );
        assert_eq!(req.path.first(), Some(&center(Point::new(0, 0))));
        assert_eq!(req.path.last(), Some(&center(Point::new(3, 2))));
        assert_eq!(req.path.len(), 6);
    }

    #[test]
    fn impossible_leaves_path_empty() {
        let map = AsciiMap::parse(
            "
            ..#..
            ..#..
            ..#..
            ",
        );
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        for method in [Method::AStar, Method::FloydWarshall] {
            let settings = PathSettings {
                method,
                ..PathSettings::default()
            };
            let mut req = request(Point::new(0, 1), Point::new(4, 1), settings);
            assert_eq!(
                planner.compute_path(&map, &mut req, &mut NoColors).unwrap(),
                PathResult::Impossible
            );
            assert!(req.path.is_empty());
        }
    }

    #[test]
    fn coloring_follows_settings() {
        let map = AsciiMap::open(5, 5);
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let mut count = 0;
        let mut req = request(Point::new(0, 0), Point::new(4, 4), PathSettings::default());
        planner
            .compute_path(&map, &mut req, &mut |_: Point, _: DebugColor| count += 1)
            .unwrap();
        assert_eq!(count, 0);

        let mut req = request(
            Point::new(0, 0),
            Point::new(4, 4),
            PathSettings {
                debug_coloring: true,
                ..PathSettings::default()
            },
        );
        planner
            .compute_path(&map, &mut req, &mut |_: Point, _: DebugColor| count += 1)
            .unwrap();
        assert!(count > 0);
        assert!(count >= planner.search().expanded());
    }

    #[test]
    fn post_processing_keeps_endpoints() {
        let map = AsciiMap::parse(
            "
            ........
            ..##....
            ..#...#.
            ......#.
            ",
        );
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let start = Point::new(0, 0);
        let goal = Point::new(7, 3);

        let mut plain = request(start, goal, PathSettings::default());
        planner.compute_path(&map, &mut plain, &mut NoColors).unwrap();

        for (rubber_banding, smoothing) in [(true, false), (false, true), (true, true)] {
            let settings = PathSettings {
                rubber_banding,
                smoothing,
                ..PathSettings::default()
            };
            let mut req = request(start, goal, settings);
            assert_eq!(
                planner.compute_path(&map, &mut req, &mut NoColors).unwrap(),
                PathResult::Complete
            );
            assert_eq!(req.path.first(), Some(&center(start)));
            assert_eq!(req.path.last(), Some(&center(goal)));
            if rubber_banding && !smoothing {
                assert!(req.path.len() <= plain.path.len());
            }
            if smoothing && !rubber_banding {
                assert_eq!(req.path.len(), plain.path.len() + 3 * (plain.path.len() - 1));
            }
            if smoothing && rubber_banding {
                // Spline input was subdivided to at most 1.5 cells per
                // segment; every fourth point is one of its waypoints.
                for i in (0..req.path.len() - 4).step_by(4) {
                    assert!(req.path[i].distance(req.path[i + 4]) <= 1.5 + 1e-4);
                }
            }
        }
    }

    #[test]
    fn map_change_drops_search_and_rebuilds_table() {
        let mut map = AsciiMap::open(5, 3);
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let settings = PathSettings {
            single_step: true,
            ..PathSettings::default()
        };
        let mut req = request(Point::new(0, 1), Point::new(4, 1), settings);
        assert_eq!(
            planner.compute_path(&map, &mut req, &mut NoColors).unwrap(),
            PathResult::Processing
        );

        for y in 0..3 {
            map.set_wall(Point::new(2, y), true);
        }
        planner.map_changed(&map);
        assert_eq!(
            planner.compute_path(&map, &mut req, &mut NoColors),
            Err(PathError::StaleCall)
        );
        let table = planner.table().unwrap();
        assert_eq!(table.distance(Point::new(0, 1), Point::new(4, 1)), None);
    }

    // ----------------------------------------------------------------------
    // Randomized properties.

    const ADMISSIBLE: [Heuristic; 3] = [Heuristic::Octile, Heuristic::Chebyshev, Heuristic::Euclidean];

    #[test]
    fn live_search_matches_table() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..12 {
            let map = random_map(&mut rng, 9, 7);
            let cells = floors(&map);
            if cells.len() < 2 {
                continue;
            }
            let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
            for _ in 0..15 {
                let start = cells[rng.random_range(0..cells.len())];
                let goal = cells[rng.random_range(0..cells.len())];
                let best = planner.table().and_then(|t| t.distance(start, goal));

                for heuristic in Heuristic::ALL {
                    let settings = PathSettings {
                        heuristic,
                        ..PathSettings::default()
                    };
                    let mut req = request(start, goal, settings);
                    let res = planner.compute_path(&map, &mut req, &mut NoColors).unwrap();
                    let Some(best) = best else {
                        assert_eq!(res, PathResult::Impossible, "{start} -> {goal}");
                        assert!(req.path.is_empty());
                        continue;
                    };
                    assert_eq!(res, PathResult::Complete, "{start} -> {goal}");
                    assert_eq!(req.path.last(), Some(&center(goal)));
                    let cost = planner.search().goal_cost().unwrap();
                    assert!(cost >= best - 1e-3, "{heuristic:?} beat the table");
                    if ADMISSIBLE.contains(&heuristic) {
                        // Euclidean charges √2 for a 1.41 step, hence the slack.
                        let tol = 1e-3 + if heuristic == Heuristic::Euclidean { 0.01 * best } else { 0.0 };
                        assert!(
                            (cost - best).abs() <= tol,
                            "{heuristic:?} {start} -> {goal}: {cost} vs {best}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_requests_are_deterministic() {
        let mut rng = SmallRng::seed_from_u64(3);
        let map = random_map(&mut rng, 10, 8);
        let cells = floors(&map);
        let settings = PathSettings {
            heuristic: Heuristic::Euclidean,
            rubber_banding: true,
            smoothing: true,
            ..PathSettings::default()
        };
        let mut a = PathPlanner::with_map(&map, SearchConfig::default());
        let mut b = PathPlanner::with_map(&map, SearchConfig::default());
        for _ in 0..20 {
            let start = cells[rng.random_range(0..cells.len())];
            let goal = cells[rng.random_range(0..cells.len())];
            let mut ra = request(start, goal, settings);
            let mut rb = request(start, goal, settings);
            let res_a = a.compute_path(&map, &mut ra, &mut NoColors).unwrap();
            let res_b = b.compute_path(&map, &mut rb, &mut NoColors).unwrap();
            assert_eq!(res_a, res_b);
            assert_eq!(ra.path, rb.path);
            // Same planner, same request again.
            let mut rc = request(start, goal, settings);
            a.compute_path(&map, &mut rc, &mut NoColors).unwrap();
            assert_eq!(ra.path, rc.path);
        }
    }

    #[test]
    fn rubber_banded_random_paths_avoid_walls() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..10 {
            let map = random_map(&mut rng, 10, 8);
            let cells = floors(&map);
            if cells.len() < 2 {
                continue;
            }
            let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
            let start = cells[rng.random_range(0..cells.len())];
            let goal = cells[rng.random_range(0..cells.len())];
            let mut req = request(start, goal, PathSettings::default());
            if planner.compute_path(&map, &mut req, &mut NoColors).unwrap() != PathResult::Complete {
                continue;
            }
            let raw = planner.search().path().to_vec();
            let banded = smooth::rubber_band(&raw, planner.graph());
            let len = |path: &[Point]| -> f32 {
                path.windows(2).map(|w| center(w[0]).distance(center(w[1]))).sum()
            };
            assert!(len(&banded) <= len(&raw) + 1e-3);
            for w in banded.windows(2) {
                assert!(!planner.graph().box_has_wall(w[0], w[1]));
            }
        }
    }
}
