//! ASCII map parsing.
//!
//! One line per row, all of the same width. `#` is a wall and `.` a floor.
//! `S` and `G` mark a floor cell as the start or goal of a request. Blank
//! lines and surrounding whitespace are ignored.

use std::fmt;
use std::str::FromStr;

use gridpath_core::{Point, Range};

use crate::tilemap::{Tile, TileMap};

/// A parsed map with its optional request markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMap {
    pub map: TileMap,
    pub start: Option<Point>,
    pub goal: Option<Point>,
}

/// Parse an ASCII map. See the module docs for the format.
pub fn parse_map(s: &str) -> Result<ParsedMap, MapError> {
    let lines: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let Some(first) = lines.first() else {
        return Err(MapError::Empty);
    };
    let width = first.chars().count();
    let mut tiles = Vec::with_capacity(width * lines.len());
    let mut start = None;
    let mut goal = None;

    for (y, line) in lines.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(MapError::InconsistentWidth {
                line: y,
                expected: width,
                found,
            });
        }
        for (x, ch) in line.chars().enumerate() {
            let pos = Point::new(x as i32, y as i32);
            let tile = match ch {
                '#' => Tile::Wall,
                '.' => Tile::Floor,
                'S' => {
                    start = Some(pos);
                    Tile::Floor
                }
                'G' => {
                    goal = Some(pos);
                    Tile::Floor
                }
                _ => return Err(MapError::InvalidChar { ch, pos }),
            };
            tiles.push(tile);
        }
    }

    let bounds = Range::with_size(width as i32, lines.len() as i32);
    log::debug!("parsed {}x{} map", bounds.width(), bounds.height());
    Ok(ParsedMap {
        map: TileMap::from_tiles(bounds, tiles),
        start,
        goal,
    })
}

impl FromStr for TileMap {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, MapError> {
        parse_map(s).map(|parsed| parsed.map)
    }
}

/// Errors that can occur when parsing a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The input holds no map lines.
    Empty,
    /// A line's width differs from the first line's.
    InconsistentWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside the map alphabet was found.
    InvalidChar { ch: char, pos: Point },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map: no map lines"),
            Self::InconsistentWidth {
                line,
                expected,
                found,
            } => write!(
                f,
                "map: line {line} is {found} cells wide, expected {expected}"
            ),
            Self::InvalidChar { ch, pos } => {
                write!(
                    f,
                    "map contains invalid character \u{201c}{ch}\u{201d} at ({}, {})",
                    pos.x, pos.y
                )
            }
        }
    }
}

impl std::error::Error for MapError {}
