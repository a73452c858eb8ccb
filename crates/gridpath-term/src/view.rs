//! Composes the map, search colors and path into a frame of glyphs.

use crossterm::style::Color;
use gridpath_core::{Point, Range, WorldPos};
use gridpath_map::{Tile, TileMap};
use gridpath_paths::{ColorSink, DebugColor, WorldMap};

/// Debug colors reported by the search, one slot per cell.
#[derive(Debug, Clone)]
pub struct ColorLayer {
    bounds: Range,
    cells: Vec<Option<DebugColor>>,
}

impl ColorLayer {
    pub fn new(bounds: Range) -> Self {
        Self {
            bounds,
            cells: vec![None; bounds.len()],
        }
    }

    pub fn get(&self, p: Point) -> Option<DebugColor> {
        self.bounds.index(p).and_then(|i| self.cells[i])
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Number of cells with the given color.
    pub fn count(&self, color: DebugColor) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }
}

impl ColorSink for ColorLayer {
    fn set_color(&mut self, p: Point, color: DebugColor) {
        if let Some(i) = self.bounds.index(p) {
            self.cells[i] = Some(color);
        }
    }
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

const OPEN_BG: Color = Color::Blue;
const CLOSED_BG: Color = Color::DarkYellow;

/// A rectangle of glyphs ready to draw.
#[derive(Debug, Clone)]
pub struct Frame {
    width: usize,
    glyphs: Vec<Glyph>,
}

impl Frame {
    /// Draw `map`, shade cells by `layer`, then overlay `path` (in world
    /// space) and the request endpoints.
    pub fn render(map: &TileMap, layer: &ColorLayer, path: &[WorldPos], start: Point, goal: Point) -> Self {
        let width = map.width().max(0) as usize;
        let mut glyphs: Vec<Glyph> = map
            .iter()
            .map(|(p, tile)| {
                let bg = match layer.get(p) {
                    Some(DebugColor::Open) => OPEN_BG,
                    Some(DebugColor::Closed) => CLOSED_BG,
                    None => Color::Reset,
                };
                let fg = match tile {
                    Tile::Wall => Color::DarkGrey,
                    Tile::Floor => Color::Grey,
                };
                Glyph {
                    ch: tile.glyph(),
                    fg,
                    bg,
                }
            })
            .collect();

        let bounds = map.bounds();
        let mut mark = |p: Point, ch: char, fg: Color| {
            if let Some(i) = bounds.index(p) {
                glyphs[i].ch = ch;
                glyphs[i].fg = fg;
            }
        };
        for &w in path {
            mark(map.to_cell(w), '*', Color::White);
        }
        mark(start, 'S', Color::Green);
        mark(goal, 'G', Color::Red);

        Self { width, glyphs }
    }

    /// Rows of glyphs, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Glyph]> {
        self.glyphs.chunks(self.width.max(1))
    }

    /// The characters alone, one line per row.
    pub fn text(&self) -> String {
        self.rows()
            .map(|row| row.iter().map(|g| g.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpath_map::parse_map;
    use gridpath_paths::{NoColors, PathPlanner, PathRequest, PathResult, PathSettings, SearchConfig};

    #[test]
    fn renders_path_and_endpoints() {
        let parsed = parse_map(
            "
            S.#..
            ..#..
            ....G
            ",
        )
        .unwrap();
        let (map, start, goal) = (parsed.map, parsed.start.unwrap(), parsed.goal.unwrap());
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let mut layer = ColorLayer::new(map.bounds());
        let settings = PathSettings {
            debug_coloring: true,
            ..PathSettings::default()
        };
        let mut req = PathRequest::new(map.to_world(start), map.to_world(goal), settings);
        assert_eq!(
            planner.compute_path(&map, &mut req, &mut layer).unwrap(),
            PathResult::Complete
        );

        let frame = Frame::render(&map, &layer, &req.path, start, goal);
        let text = frame.text();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with('S'));
        assert!(text.ends_with('G'));
        assert!(text.contains('*'));
        assert_eq!(text.matches('#').count(), 2);

        assert!(layer.count(DebugColor::Closed) > 0);
        let shaded = frame.rows().flatten().filter(|g| g.bg != Color::Reset).count();
        assert_eq!(
            shaded,
            layer.count(DebugColor::Open) + layer.count(DebugColor::Closed)
        );
    }

    #[test]
    fn layer_ignores_off_map_cells() {
        let mut layer = ColorLayer::new(Range::with_size(2, 2));
        layer.set_color(Point::new(5, 5), DebugColor::Open);
        layer.set_color(Point::new(1, 1), DebugColor::Closed);
        assert_eq!(layer.get(Point::new(1, 1)), Some(DebugColor::Closed));
        assert_eq!(layer.count(DebugColor::Open), 0);
        layer.clear();
        assert_eq!(layer.get(Point::new(1, 1)), None);
    }

    #[test]
    fn no_colors_leaves_background_plain() {
        let map = TileMap::new(4, 1);
        let layer = ColorLayer::new(map.bounds());
        let mut planner = PathPlanner::with_map(&map, SearchConfig::default());
        let mut req = PathRequest::new(
            map.to_world(Point::new(0, 0)),
            map.to_world(Point::new(3, 0)),
            PathSettings::default(),
        );
        planner.compute_path(&map, &mut req, &mut NoColors).unwrap();
        let frame = Frame::render(&map, &layer, &req.path, Point::new(0, 0), Point::new(3, 0));
        assert_eq!(frame.text(), "S**G");
        assert!(frame.rows().flatten().all(|g| g.bg == Color::Reset));
    }
}
