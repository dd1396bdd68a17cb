/// The logo background: a fixed W×H character grid plus the letter table
/// ghosts are spawned from.

use crate::error::SetupError;

pub const BLANK: char = ' ';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Vec<char>>,
}

/// A grid cell holding an ASCII letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterPosition {
    pub x: usize,
    pub y: usize,
    pub ch: char,
}

impl Grid {
    /// Blank grid. Zero-sized geometry is refused.
    pub fn blank(width: usize, height: usize) -> Result<Self, SetupError> {
        if width == 0 || height == 0 {
            return Err(SetupError::EmptyGrid { width, height });
        }
        Ok(Grid { width, height, cells: vec![vec![BLANK; width]; height] })
    }

    /// Place `art` with its left edge at `start_x`, vertically centered.
    /// Cells falling outside the grid are clipped; blank art cells leave
    /// the background untouched.
    pub fn build(art: &[String], start_x: i32, width: usize, height: usize) -> Result<Self, SetupError> {
        let mut grid = Grid::blank(width, height)?;
        let rows: Vec<&str> = art.iter().map(|l| l.trim_end()).collect();
        // Widened so extreme offsets clip instead of overflowing.
        let start_y = (height as i64 - rows.len() as i64) / 2;

        for (row, line) in rows.iter().enumerate() {
            let y = start_y + row as i64;
            if y < 0 || y >= height as i64 { continue; }
            for (col, ch) in line.chars().enumerate() {
                if ch == BLANK { continue; }
                let x = start_x as i64 + col as i64;
                if x < 0 || x >= width as i64 { continue; }
                grid.cells[y as usize][x as usize] = ch;
            }
        }
        Ok(grid)
    }

    /// Character at (x, y); blank out of bounds.
    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> char {
        if x < self.width && y < self.height {
            self.cells[y][x]
        } else {
            BLANK
        }
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.cells
    }
}

/// Widest line of the art after trimming trailing whitespace.
pub fn art_width(art: &[String]) -> usize {
    art.iter().map(|l| l.trim_end().chars().count()).max().unwrap_or(0)
}

/// Every `[A-Za-z]` cell, row-major.
pub fn extract_letter_positions(grid: &Grid) -> Vec<LetterPosition> {
    let mut out = Vec::new();
    for (y, row) in grid.rows().iter().enumerate() {
        for (x, &ch) in row.iter().enumerate() {
            if ch.is_ascii_alphabetic() {
                out.push(LetterPosition { x, y, ch });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn render(grid: &Grid) -> Vec<String> {
        grid.rows().iter().map(|r| r.iter().collect()).collect()
    }

    #[test]
    fn art_is_vertically_centered() {
        let g = Grid::build(&art(&["ABCD"]), 2, 10, 4).unwrap();
        assert_eq!(render(&g), vec![
            "          ",
            "  ABCD    ",
            "          ",
            "          ",
        ]);
    }

    #[test]
    fn trailing_whitespace_and_blanks_pass_through() {
        let g = Grid::build(&art(&["A B   ", "|_|"]), 0, 5, 2).unwrap();
        assert_eq!(render(&g), vec!["A B  ", "|_|  "]);
    }

    #[test]
    fn cells_outside_the_grid_are_clipped() {
        let g = Grid::build(&art(&["XYZ", "UVW", "RST", "OPQ"]), -1, 2, 2).unwrap();
        // start_y = (2 - 4) / 2 = -1 → rows 1 and 2 of the art are visible
        assert_eq!(render(&g), vec!["VW", "ST"]);
    }

    #[test]
    fn extreme_offsets_clip_without_overflow() {
        let a = art(&["AB"]);
        assert_eq!(render(&Grid::build(&a, i32::MAX, 4, 1).unwrap()), vec!["    "]);
        assert_eq!(render(&Grid::build(&a, i32::MIN, 4, 1).unwrap()), vec!["    "]);
    }

    #[test]
    fn build_is_deterministic() {
        let a = art(&[" _ ", "|D|"]);
        assert_eq!(Grid::build(&a, 3, 8, 5).unwrap(), Grid::build(&a, 3, 8, 5).unwrap());
    }

    #[test]
    fn zero_size_is_refused() {
        assert!(matches!(Grid::build(&[], 0, 0, 4), Err(SetupError::EmptyGrid { .. })));
        assert!(matches!(Grid::blank(3, 0), Err(SetupError::EmptyGrid { .. })));
    }

    #[test]
    fn letters_exclude_border_art() {
        let g = Grid::build(&art(&[" ___ ", "| D |", "|_o_|"]), 0, 5, 3).unwrap();
        let letters = extract_letter_positions(&g);
        assert_eq!(letters, vec![
            LetterPosition { x: 2, y: 1, ch: 'D' },
            LetterPosition { x: 2, y: 2, ch: 'o' },
        ]);
    }

    #[test]
    fn no_letters_in_blank_grid() {
        let g = Grid::blank(4, 4).unwrap();
        assert!(extract_letter_positions(&g).is_empty());
    }

    #[test]
    fn art_width_ignores_trailing_spaces() {
        assert_eq!(art_width(&art(&["ab   ", "abcd", ""])), 4);
        assert_eq!(art_width(&[]), 0);
    }

    #[test]
    fn get_out_of_bounds_is_blank() {
        let g = Grid::build(&art(&["Q"]), 0, 1, 1).unwrap();
        assert_eq!(g.get(0, 0), 'Q');
        assert_eq!(g.get(5, 0), BLANK);
    }
}
