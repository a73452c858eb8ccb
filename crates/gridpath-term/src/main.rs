//! gridpath-view: runs one path request and draws it in the terminal.

mod args;
mod term;
mod view;

use std::fs;
use std::io;
use std::thread;

use gridpath_core::Point;
use gridpath_map::{CellularAutomataRule, MapGen, TileMap, parse_map};
use gridpath_paths::{Method, PathPlanner, PathRequest, PathResult, SearchConfig, WorldMap};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use args::{Args, USAGE};
use view::{ColorLayer, Frame};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let json = args.config.as_ref().map(fs::read_to_string).transpose()?;
    let config = search_config(&args, json.as_deref())?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let (map, start, goal) = load_map(&args, &mut rng)?;

    let mut planner = PathPlanner::with_map(&map, config);
    let mut layer = ColorLayer::new(map.bounds());
    let mut request = PathRequest::new(map.to_world(start), map.to_world(goal), args.settings);
    let mut out = io::stdout();

    let result = loop {
        let result = planner.compute_path(&map, &mut request, &mut layer)?;
        let Some(delay) = args.animate else {
            break result;
        };
        term::redraw(&mut out, &Frame::render(&map, &layer, &request.path, start, goal))?;
        if result != PathResult::Processing {
            break result;
        }
        thread::sleep(delay);
    };

    if args.animate.is_none() {
        term::draw(&mut out, &Frame::render(&map, &layer, &request.path, start, goal))?;
    }
    let search = planner.search();
    match result {
        PathResult::Complete => {
            let cost = search
                .goal_cost()
                .or_else(|| planner.table().and_then(|t| t.distance(start, goal)));
            println!(
                "{start} -> {goal}: complete, {} waypoints, cost {}, {} expansions",
                request.path.len(),
                cost.map_or_else(|| "?".to_string(), |c| format!("{c:.2}")),
                search.expanded()
            );
        }
        PathResult::Impossible => println!("{start} -> {goal}: no path"),
        PathResult::Processing => println!("{start} -> {goal}: unfinished"),
    }
    Ok(())
}

/// Search configuration from the optional JSON text. The all-pairs table is
/// only built for `--floyd` unless the JSON sets `precompute_all_pairs`.
fn search_config(args: &Args, json: Option<&str>) -> Result<SearchConfig, serde_json::Error> {
    let mut config = SearchConfig::default();
    let mut explicit = false;
    if let Some(json) = json {
        let value: serde_json::Value = serde_json::from_str(json)?;
        explicit = value.get("precompute_all_pairs").is_some();
        config = serde_json::from_value(value)?;
    }
    if !explicit {
        config.precompute_all_pairs = args.settings.method == Method::FloydWarshall;
    }
    Ok(config)
}

/// Read the map file or generate a map, and pick the request endpoints.
fn load_map(args: &Args, rng: &mut SmallRng) -> Result<(TileMap, Point, Point), Box<dyn std::error::Error>> {
    let (map, start, goal) = match &args.map_file {
        Some(path) => {
            let parsed = parse_map(&fs::read_to_string(path)?)?;
            (parsed.map, parsed.start, parsed.goal)
        }
        None => {
            let mut mg = MapGen::with_map(TileMap::new(args.width, args.height), rng.clone());
            if args.cave {
                mg.cellular_automata_cave(0.45, &[CellularAutomataRule::default()]);
            } else {
                mg.scatter(args.wall_pct);
            }
            *rng = mg.rng;
            (mg.map, None, None)
        }
    };

    let mut mg = MapGen::with_map(map, rng.clone());
    let start = args.from.or(start).or_else(|| mg.random_floor());
    let goal = args.to.or(goal).or_else(|| mg.random_floor());
    let (Some(start), Some(goal)) = (start, goal) else {
        return Err("map has no floor cell to start from".into());
    };
    Ok((mg.map, start, goal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &[&str]) -> Args {
        Args::parse(cmd.iter().copied()).unwrap()
    }

    #[test]
    fn table_built_only_for_floyd() {
        assert!(!search_config(&args(&[]), None).unwrap().precompute_all_pairs);
        assert!(search_config(&args(&["--floyd"]), None).unwrap().precompute_all_pairs);

        let cfg = search_config(&args(&[]), Some(r#"{"bucket_capacity": 80}"#)).unwrap();
        assert!(!cfg.precompute_all_pairs);
        assert_eq!(cfg.bucket_capacity, Some(80));
    }

    #[test]
    fn config_file_setting_wins() {
        let on = Some(r#"{"precompute_all_pairs": true}"#);
        assert!(search_config(&args(&[]), on).unwrap().precompute_all_pairs);
        let off = Some(r#"{"precompute_all_pairs": false}"#);
        assert!(!search_config(&args(&["--floyd"]), off).unwrap().precompute_all_pairs);
    }

    #[test]
    fn plain_request_skips_the_table() {
        let map = TileMap::new(6, 4);
        let planner = PathPlanner::with_map(&map, search_config(&args(&[]), None).unwrap());
        assert!(planner.table().is_none());
    }
}
