//! Text layouts: `.` is walkable, `#` is blocked, first line is `y = 0`.

use super::Grid;
use crate::config::GridConfig;
use crate::error::GridError;
use crate::geometry::Position;

pub const WALKABLE_GLYPH: char = '.';
pub const BLOCKED_GLYPH: char = '#';

/// Parses a layout into row-major walkable flags plus its dimensions.
///
/// Blank lines are ignored and surrounding whitespace on each line is trimmed.
pub fn parse_layout(layout: &str) -> Result<(u32, u32, Vec<bool>), GridError> {
    let rows: Vec<&str> = layout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let Some(first) = rows.first() else {
        return Err(GridError::EmptyLayout);
    };
    let width = first.chars().count();

    let mut walkable = Vec::with_capacity(width * rows.len());
    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(GridError::RaggedLayout {
                row,
                expected: width,
                found,
            });
        }
        for (column, glyph) in line.chars().enumerate() {
            match glyph {
                WALKABLE_GLYPH => walkable.push(true),
                BLOCKED_GLYPH => walkable.push(false),
                glyph => {
                    return Err(GridError::UnknownGlyph { glyph, row, column });
                }
            }
        }
    }

    Ok((width as u32, rows.len() as u32, walkable))
}

impl Grid {
    /// Builds a grid centred on the world origin from a text layout.
    pub fn from_layout(layout: &str, cell_radius: f32) -> Result<Self, GridError> {
        let (width, height, walkable) = parse_layout(layout)?;
        let config = GridConfig::with_cells(width, height, cell_radius);
        Self::from_fn(config, |Position { x, y }| {
            walkable[y as usize * width as usize + x as usize]
        })
    }

    /// Renders the walkability map back into layout glyphs.
    pub fn to_layout(&self) -> String {
        let mut out = String::with_capacity(self.len() + self.height() as usize);
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let glyph = if self.is_walkable(Position::new(x, y)) {
                    WALKABLE_GLYPH
                } else {
                    BLOCKED_GLYPH
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_round_trips_through_grid() {
        let layout = "..#.\n.##.\n....\n";
        let grid = Grid::from_layout(layout, 0.5).unwrap();
        assert_eq!((grid.width(), grid.height()), (4, 3));
        assert!(!grid.is_walkable(Position::new(2, 0)));
        assert!(grid.is_walkable(Position::new(0, 2)));
        assert_eq!(grid.to_layout(), layout);
    }

    #[test]
    fn malformed_layouts_are_rejected() {
        assert_eq!(parse_layout("  \n"), Err(GridError::EmptyLayout));
        assert_eq!(
            parse_layout("...\n..\n"),
            Err(GridError::RaggedLayout {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            parse_layout("..x"),
            Err(GridError::UnknownGlyph {
                glyph: 'x',
                row: 0,
                column: 2
            })
        );
    }
}
