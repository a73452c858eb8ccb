//! Command-line options.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use gridpath_core::Point;
use gridpath_paths::{Heuristic, Method, PathSettings};

pub const USAGE: &str = "\
usage: gridpath-view [MAP_FILE] [options]

Runs one path request and draws the map, the searched cells and the path.
Without MAP_FILE a random map is generated. In a map file `#` is a wall,
`.` a floor, and `S`/`G` mark the start and goal.

options:
  --size WxH          size of a generated map (default 40x20)
  --walls PCT         wall probability of a generated map (default 0.3)
  --cave              generate a cellular-automata cave instead
  --seed N            random seed (default 1)
  --from X,Y          start cell (default: S marker or random floor)
  --to X,Y            goal cell (default: G marker or random floor)
  --heuristic NAME    manhattan, chebyshev, euclidean, octile, inconsistent
  --weight W          heuristic weight (default 1)
  --floyd             answer from the all-pairs table
  --rubber            rubber-band the path
  --smooth            smooth the path with Catmull-Rom splines
  --no-debug-colors   do not show open and closed cells
  --animate MS        single-step the search, redrawing every MS milliseconds
  --config FILE       JSON search configuration
  -h, --help          show this help";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub map_file: Option<PathBuf>,
    pub width: i32,
    pub height: i32,
    pub wall_pct: f64,
    pub cave: bool,
    pub seed: u64,
    pub from: Option<Point>,
    pub to: Option<Point>,
    pub settings: PathSettings,
    pub animate: Option<Duration>,
    pub config: Option<PathBuf>,
    pub help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            map_file: None,
            width: 40,
            height: 20,
            wall_pct: 0.3,
            cave: false,
            seed: 1,
            from: None,
            to: None,
            settings: PathSettings {
                debug_coloring: true,
                ..PathSettings::default()
            },
            animate: None,
            config: None,
            help: false,
        }
    }
}

impl Args {
    /// Parse arguments, program name excluded.
    pub fn parse<I, S>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Args::default();
        let mut it = args.into_iter().map(Into::<String>::into);
        while let Some(arg) = it.next() {
            let mut value = |name: &str| it.next().ok_or_else(|| ArgsError::MissingValue(name.to_string()));
            match arg.as_str() {
                "-h" | "--help" => out.help = true,
                "--cave" => out.cave = true,
                "--floyd" => out.settings.method = Method::FloydWarshall,
                "--rubber" => out.settings.rubber_banding = true,
                "--smooth" => out.settings.smoothing = true,
                "--no-debug-colors" => out.settings.debug_coloring = false,
                "--size" => {
                    let v = value(&arg)?;
                    let (w, h) = v.split_once('x').ok_or_else(|| invalid(&arg, &v))?;
                    out.width = number(&arg, w)?;
                    out.height = number(&arg, h)?;
                }
                "--walls" => out.wall_pct = number(&arg, &value(&arg)?)?,
                "--seed" => out.seed = number(&arg, &value(&arg)?)?,
                "--from" => out.from = Some(point(&arg, &value(&arg)?)?),
                "--to" => out.to = Some(point(&arg, &value(&arg)?)?),
                "--heuristic" => {
                    let v = value(&arg)?;
                    out.settings.heuristic =
                        Heuristic::from_name(&v.to_lowercase()).ok_or_else(|| invalid(&arg, &v))?;
                }
                "--weight" => out.settings.weight = number(&arg, &value(&arg)?)?,
                "--animate" => {
                    let ms: u64 = number(&arg, &value(&arg)?)?;
                    out.animate = Some(Duration::from_millis(ms));
                    out.settings.single_step = true;
                }
                "--config" => out.config = Some(PathBuf::from(value(&arg)?)),
                _ if arg.starts_with('-') => return Err(ArgsError::Unknown(arg)),
                _ if out.map_file.is_none() => out.map_file = Some(PathBuf::from(arg)),
                _ => return Err(ArgsError::Unknown(arg)),
            }
        }
        Ok(out)
    }
}

fn invalid(name: &str, value: &str) -> ArgsError {
    ArgsError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ArgsError> {
    value.trim().parse().map_err(|_| invalid(name, value))
}

fn point(name: &str, value: &str) -> Result<Point, ArgsError> {
    let (x, y) = value.split_once(',').ok_or_else(|| invalid(name, value))?;
    Ok(Point::new(number(name, x)?, number(name, y)?))
}

/// Errors that can occur when parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// An option or extra positional argument that is not recognized.
    Unknown(String),
    /// An option that needs a value came last.
    MissingValue(String),
    /// An option value that does not parse.
    InvalidValue { name: String, value: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(arg) => write!(f, "unknown argument {arg:?}"),
            Self::MissingValue(name) => write!(f, "{name} needs a value"),
            Self::InvalidValue { name, value } => write!(f, "invalid value {value:?} for {name}"),
        }
    }
}

impl std::error::Error for ArgsError {}
