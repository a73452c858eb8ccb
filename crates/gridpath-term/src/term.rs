//! Writes frames to a terminal with crossterm.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::view::Frame;

/// Draw `frame` at the cursor, one terminal line per row.
pub fn draw(out: &mut impl Write, frame: &Frame) -> io::Result<()> {
    for row in frame.rows() {
        for g in row {
            queue!(
                out,
                SetForegroundColor(g.fg),
                SetBackgroundColor(g.bg),
                Print(g.ch)
            )?;
        }
        queue!(out, ResetColor, Print("\r\n"))?;
    }
    out.flush()
}

/// Clear the screen and draw `frame` from the top-left corner.
pub fn redraw(out: &mut impl Write, frame: &Frame) -> io::Result<()> {
    queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    draw(out, frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ColorLayer;
    use gridpath_core::Point;
    use gridpath_map::TileMap;

    #[test]
    fn draw_writes_every_glyph() {
        let mut map = TileMap::new(3, 2);
        map.set(Point::new(1, 1), gridpath_map::Tile::Wall);
        let layer = ColorLayer::new(map.bounds());
        let frame = Frame::render(&map, &layer, &[], Point::new(0, 0), Point::new(2, 0));
        let mut buf: Vec<u8> = Vec::new();
        draw(&mut buf, &frame).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains('S') && s.contains('G') && s.contains('#'));
        assert_eq!(s.matches("\r\n").count(), 2);
    }
}
